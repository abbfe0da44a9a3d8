//! Link rewriting
//!
//! All candidate spans are found against the original text. Entities are
//! visited in pool order, then intra-pool order, and each entity's matches
//! left to right; a span is accepted only if it does not intersect a span
//! accepted earlier (or, with the markup guard on, existing markup). The
//! output is then produced in a single pass over the original text, so a
//! later pattern can never match inside a link inserted for an earlier one.
//! A qualified mention whose span is taken may still link its bare title, as
//! long as that lies inside the mention and is free.

use std::collections::BTreeMap;
use std::ops::Range;

use super::gazetteer::Matcher;
use super::markup::{existing_markup, render_link};
use super::settings::XrefSettings;
use crate::domain::Variant;

/// A mention that will be turned into a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    /// Byte range in the original text
    pub range: Range<usize>,
    pub variant: Variant,
    pub id: String,
}

/// Non-overlapping half-open ranges keyed by start offset
#[derive(Debug, Default)]
struct SpanSet {
    spans: BTreeMap<usize, usize>,
}

impl SpanSet {
    fn intersects(&self, start: usize, end: usize) -> bool {
        // With disjoint spans, only the last one starting before `end` can reach past `start`
        self.spans
            .range(..end)
            .next_back()
            .is_some_and(|(_, &span_end)| span_end > start)
    }

    fn insert(&mut self, start: usize, end: usize) {
        self.spans.insert(start, end);
    }
}

impl Matcher {
    /// Resolves the mentions to link, sorted by position
    pub fn link_spans(&self, text: &str, guard_markup: bool) -> Vec<LinkSpan> {
        let mut protected = SpanSet::default();
        if guard_markup {
            for (start, end) in existing_markup(text) {
                protected.insert(start, end);
            }
        }

        let mut accepted = SpanSet::default();
        let mut spans = Vec::new();

        let free = |accepted: &SpanSet, start: usize, end: usize| {
            start < end && !protected.intersects(start, end) && !accepted.intersects(start, end)
        };

        for entry in self.entries() {
            for m in entry.regex.find_iter(text) {
                let (mut start, mut end) = (m.start(), m.end());
                if !free(&accepted, start, end) {
                    // A qualified mention that lost its span may still link by its bare title
                    let Some(bare) = entry
                        .bare
                        .as_ref()
                        .and_then(|bare| bare.find_at(text, start))
                        .filter(|b| b.end() <= end && free(&accepted, b.start(), b.end()))
                    else {
                        continue;
                    };
                    (start, end) = (bare.start(), bare.end());
                }
                accepted.insert(start, end);
                spans.push(LinkSpan {
                    range: start..end,
                    variant: entry.variant,
                    id: entry.id.clone(),
                });
            }
        }

        spans.sort_by_key(|span| span.range.start);
        spans
    }

    /// Wraps every resolved mention in a link, keeping the matched text as
    /// the label
    pub fn annotate(&self, text: &str, settings: &XrefSettings) -> String {
        let spans = self.link_spans(text, settings.guard_markup);
        rewrite(text, &spans, settings)
    }
}

/// Emits `text` with each span replaced by its link. Spans are taken in
/// order of position; a span that overlaps an earlier one, runs past the end
/// of `text` or does not fall on char boundaries is left out.
pub fn rewrite(text: &str, spans: &[LinkSpan], settings: &XrefSettings) -> String {
    if spans.is_empty() {
        return text.to_string();
    }

    let mut ordered: Vec<&LinkSpan> = spans.iter().collect();
    ordered.sort_by_key(|span| (span.range.start, span.range.end));

    let mut out = String::with_capacity(text.len() + spans.len() * 128);
    let mut cursor = 0;
    for span in ordered {
        let range = span.range.clone();
        if range.start < cursor
            || range.start >= range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.push_str(&render_link(span.variant, &span.id, &text[range.clone()], settings));
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
