//! Reference detection
//!
//! Reports which known entities a text mentions, without touching the text.
//! Each entity is tested independently against the original text, so two
//! entities with the same or overlapping titles both fire.

use serde::Serialize;

use super::gazetteer::Matcher;
use crate::domain::Variant;

/// A detected mention of a known entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// The entity's bare title, whichever surface form actually matched
    pub matched_text: String,
    #[serde(rename = "type")]
    pub variant: Variant,
    pub id: String,
    pub title: String,
}

/// A referenced item, as listed in "referenced items" summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencedItem {
    #[serde(rename = "type")]
    pub variant: Variant,
    pub id: String,
    pub title: String,
}

impl From<Reference> for ReferencedItem {
    fn from(reference: Reference) -> Self {
        Self {
            variant: reference.variant,
            id: reference.id,
            title: reference.title,
        }
    }
}

impl Matcher {
    /// Returns one reference per entity mentioned anywhere in `text`,
    /// in pool order then intra-pool order
    pub fn detect(&self, text: &str) -> Vec<Reference> {
        self.entries()
            .iter()
            .filter(|entry| entry.regex.is_match(text))
            .map(|entry| Reference {
                matched_text: entry.title.clone(),
                variant: entry.variant,
                id: entry.id.clone(),
                title: entry.title.clone(),
            })
            .collect()
    }

    /// Detection projected to type, id and title
    pub fn referenced_items(&self, text: &str) -> Vec<ReferencedItem> {
        self.detect(text).into_iter().map(ReferencedItem::from).collect()
    }
}
