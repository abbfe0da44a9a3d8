//! Cross-referencing commands (detect, refs, annotate)
//!
//! The text comes from `--text`, `--file`, `--of TYPE:ID` (the body of a
//! stored entity) or stdin. The pools come from the project store, or from
//! `--snapshot FILE` when given.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::output::Output;
use crate::domain::{Snapshot, Variant};
use crate::storage::{load_snapshot, Config, Project};
use crate::xref::{self, Matcher, XrefSettings};

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Text to scan
    #[arg(long, short, conflicts_with_all = ["file", "of"])]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(long, conflicts_with = "of")]
    pub file: Option<PathBuf>,

    /// Scan the body of a stored entity (e.g. `article:k-1a2b3c4`); the
    /// entity itself is left out of the gazetteer
    #[arg(long, value_name = "TYPE:ID")]
    pub of: Option<String>,

    /// Read the pools from a JSON or YAML snapshot instead of the project
    #[arg(long, short)]
    pub snapshot: Option<PathBuf>,

    /// Leave an entity out of the gazetteer (repeatable)
    #[arg(long, value_name = "TYPE:ID")]
    pub exclude: Vec<String>,
}

/// Parses `type:id`
fn parse_entity_ref(value: &str) -> Result<(Variant, String)> {
    let (variant, id) = value
        .split_once(':')
        .with_context(|| format!("Expected TYPE:ID, got '{}'", value))?;
    let variant: Variant = variant.parse()?;
    if id.trim().is_empty() {
        anyhow::bail!("Missing id in '{}'", value);
    }
    Ok((variant, id.trim().to_string()))
}

/// Everything a cross-referencing command needs
struct Prepared {
    text: String,
    matcher: Matcher,
    settings: XrefSettings,
}

fn prepare(output: &Output, args: &SourceArgs, context: &str) -> Result<Prepared> {
    let (mut snapshot, settings) = load_pools(output, args, context)?;

    let mut excluded = Vec::new();
    for value in &args.exclude {
        excluded.push(parse_entity_ref(value)?);
    }

    let text = match (&args.text, &args.file, &args.of) {
        (Some(text), _, _) => text.clone(),
        (_, Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (_, _, Some(of)) => {
            let (variant, id) = parse_entity_ref(of)?;
            let body = snapshot
                .body_of(variant, &id)
                .map(String::from)
                .with_context(|| format!("No {} with id '{}'", variant, id))?;
            excluded.push((variant, id));
            body
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
            text
        }
    };

    for (variant, id) in &excluded {
        if snapshot.exclude(*variant, id) {
            output.verbose_ctx(context, &format!("Excluded {} {}", variant, id));
        }
    }

    let matcher = xref::compile(&snapshot, &settings);
    output.verbose_ctx(
        context,
        &format!(
            "Compiled {} patterns from {} entities ({} chars of text)",
            matcher.entries().len(),
            snapshot.len(),
            text.chars().count()
        ),
    );
    for skipped in matcher.skipped() {
        output.verbose_ctx(
            context,
            &format!(
                "Skipped {} {} ({:?}): {}",
                skipped.variant, skipped.id, skipped.title, skipped.reason
            ),
        );
    }

    Ok(Prepared {
        text,
        matcher,
        settings,
    })
}

/// Loads the pools and the settings to scan them with
fn load_pools(output: &Output, args: &SourceArgs, context: &str) -> Result<(Snapshot, XrefSettings)> {
    if let Some(path) = &args.snapshot {
        output.verbose_ctx(context, &format!("Loading snapshot: {}", path.display()));
        let snapshot = load_snapshot(path)?;

        // Settings still come from the enclosing project, when there is one
        let settings = match Config::find_project_root() {
            Some(root) => Config::for_project(&root)?.project.xref,
            None => XrefSettings::default(),
        };
        return Ok((snapshot, settings));
    }

    let project = Project::open_current()?;
    output.verbose_ctx(
        context,
        &format!("Opened knowledge base at: {}", project.root().display()),
    );
    let snapshot = project.link_snapshot()?;
    Ok((snapshot, project.config().project.xref.clone()))
}

/// List the entities a text mentions
pub fn detect(output: &Output, args: &SourceArgs) -> Result<()> {
    let prepared = prepare(output, args, "detect")?;
    let references = prepared.matcher.detect(&prepared.text);

    if output.is_json() {
        output.data(&references);
    } else if references.is_empty() {
        println!("No references found.");
    } else {
        println!("{:<10} {:<12} TITLE", "TYPE", "ID");
        println!("{}", "-".repeat(60));
        for reference in &references {
            println!(
                "{:<10} {:<12} {}",
                reference.variant, reference.id, reference.title
            );
        }
        println!();
        println!("Found {} reference(s)", references.len());
    }

    Ok(())
}

/// List referenced items for a text
pub fn refs(output: &Output, args: &SourceArgs) -> Result<()> {
    let prepared = prepare(output, args, "refs")?;
    let items = prepared.matcher.referenced_items(&prepared.text);

    if output.is_json() {
        output.data(&items);
    } else {
        for item in &items {
            println!("{}\t{}\t{}", item.variant, item.id, item.title);
        }
    }

    Ok(())
}

/// Link every mention in a text
pub fn annotate(output: &Output, args: &SourceArgs) -> Result<()> {
    let prepared = prepare(output, args, "annotate")?;
    let spans = prepared
        .matcher
        .link_spans(&prepared.text, prepared.settings.guard_markup);
    output.verbose_ctx("annotate", &format!("Linking {} mention(s)", spans.len()));

    let annotated = xref::rewrite(&prepared.text, &spans, &prepared.settings);

    if output.is_json() {
        output.data(&serde_json::json!({
            "text": annotated,
            "links": spans.len(),
        }));
    } else {
        print!("{}", annotated);
        if !annotated.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entity_refs() {
        assert_eq!(
            parse_entity_ref("article:k-1234567").unwrap(),
            (Variant::Article, "k-1234567".to_string())
        );
        assert_eq!(
            parse_entity_ref("system: s1 ").unwrap(),
            (Variant::System, "s1".to_string())
        );
    }

    #[test]
    fn rejects_malformed_entity_refs() {
        assert!(parse_entity_ref("article").is_err());
        assert!(parse_entity_ref("quiz:q1").is_err());
        assert!(parse_entity_ref("system:").is_err());
    }
}
