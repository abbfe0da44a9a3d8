//! Link markup
//!
//! Renders the anchor that wraps a mention, and locates markup already
//! present in a text so the rewriter can leave it alone.

use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use super::settings::XrefSettings;
use crate::domain::Variant;

/// One `name=value` attribute. Bare words are not attributes, so prose such
/// as `x<y then open CRM>` is never taken for a tag.
const ATTRIBUTE: &str = r#"\s+[a-z_:][-a-z0-9_:.]*\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+)"#;

/// Whole anchor elements first, then comments, closing tags and opening tags
static EXISTING_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?is)<a(?:{attr})*\s*>.*?</a\s*>|<!--.*?-->|</[a-z][a-z0-9-]*\s*>|<[a-z][a-z0-9-]*(?:{attr})*\s*/?>",
        attr = ATTRIBUTE
    );
    Regex::new(&pattern).expect("static markup pattern is valid")
});

/// Escapes a value for use inside a double-quoted HTML attribute
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Builds the link target for an entity: `{route}?id={id}`
pub fn link_target(route: &str, id: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("{}?id={}", route, encoded)
}

/// Renders the anchor for one mention. `label` is emitted verbatim.
pub fn render_link(variant: Variant, id: &str, label: &str, settings: &XrefSettings) -> String {
    let type_tag = variant.as_str();
    let class = escape_attr(&settings.link_class);
    format!(
        r#"<a href="{href}" class="{class} {class}-{type_tag}" data-type="{type_tag}" data-id="{id}">{label}</a>"#,
        href = escape_attr(&link_target(settings.routes.get(variant), id)),
        class = class,
        type_tag = type_tag,
        id = escape_attr(id),
        label = label,
    )
}

/// Byte ranges of markup already present in `text`
pub fn existing_markup(text: &str) -> Vec<(usize, usize)> {
    if !text.contains('<') {
        return Vec::new();
    }
    EXISTING_MARKUP
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect()
}
