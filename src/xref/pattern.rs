//! Title → pattern construction
//!
//! Titles are user-authored, so they are always escaped: a title such as
//! `"שאלה? (תמיכה)"` matches only itself. The pattern recognizes the bare
//! title and, when the variant has a qualifier word, the qualified form
//! `"<qualifier> <title>"`. The qualified alternative comes first so that a
//! qualified mention is matched as a whole.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Upper bound on the compiled size of a single title's pattern
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("title is empty")]
    EmptyTitle,

    #[error("pattern rejected by regex engine: {0}")]
    Engine(#[from] regex::Error),
}

/// Builds the regex source for a title, or None if the title is blank
pub fn pattern_source(title: &str, qualifier: &str) -> Option<String> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }

    let escaped = regex::escape(title);
    let qualifier = qualifier.trim();
    if qualifier.is_empty() {
        Some(escaped)
    } else {
        Some(format!(r"{}\s+{}|{}", regex::escape(qualifier), escaped, escaped))
    }
}

/// Compiles a case-insensitive, Unicode-aware matcher for a title
pub fn build_pattern(title: &str, qualifier: &str) -> Result<Regex, PatternError> {
    let source = pattern_source(title, qualifier).ok_or(PatternError::EmptyTitle)?;

    let regex = RegexBuilder::new(&source)
        .case_insensitive(true)
        .unicode(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?;

    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_produce_no_pattern() {
        assert!(pattern_source("", "נוהל").is_none());
        assert!(pattern_source("  \t\n", "נוהל").is_none());
        assert!(matches!(build_pattern("   ", ""), Err(PatternError::EmptyTitle)));
    }

    #[test]
    fn metacharacters_are_literal() {
        let re = build_pattern("שאלה? (תמיכה)", "").unwrap();

        assert!(re.is_match("ראו שאלה? (תמיכה) למטה"));
        assert!(!re.is_match("שאל תמיכה"));
        assert!(!re.is_match("שאלה תמיכה"));
    }

    #[test]
    fn regex_only_titles_compile() {
        for title in ["(", ")", "[", "*", "+?", "\\", ".*", "a|b", "^$", "{2}"] {
            let re = build_pattern(title, "נוהל").unwrap();
            assert!(re.is_match(&format!("x {} y", title)), "title {:?}", title);
        }

        let re = build_pattern("a|b", "").unwrap();
        assert!(!re.is_match("a"));
    }

    #[test]
    fn matching_is_case_insensitive_beyond_ascii() {
        let re = build_pattern("Straße Ärger", "").unwrap();
        assert!(re.is_match("STRAßE ÄRGER"));

        let re = build_pattern("Σύστημα", "").unwrap();
        assert!(re.is_match("σύστημα"));
    }

    #[test]
    fn qualified_form_is_preferred_at_the_same_position() {
        let re = build_pattern("Alpha", "נוהל").unwrap();
        let m = re.find("ראה נוהל  Alpha").unwrap();
        assert_eq!(m.as_str(), "נוהל  Alpha");
    }

    #[test]
    fn titles_are_trimmed() {
        let re = build_pattern("  CRM  ", "").unwrap();
        assert_eq!(re.find("open CRM.").unwrap().as_str(), "CRM");
    }

    #[test]
    fn empty_qualifier_disables_qualified_form() {
        assert_eq!(pattern_source("CRM", " ").unwrap(), "CRM");
    }
}
