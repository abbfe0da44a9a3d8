//! Tunables for matching and link rendering
//!
//! All of these are loaded from the `[xref]` table of `.kb/config.toml`;
//! the defaults reproduce the knowledge base's built-in behavior.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Variant;

#[derive(Debug, Error, PartialEq)]
pub enum PoolOrderError {
    #[error("Pool order lists '{0}' more than once")]
    Duplicate(Variant),

    #[error("Pool order is empty")]
    Empty,
}

/// Explicit tie-break policy: the sequence in which pools are scanned.
///
/// When two entities match the same text, the one from the earlier pool
/// wins the link. Variants left out of the order are not scanned at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Variant>", into = "Vec<Variant>")]
pub struct PoolOrder(Vec<Variant>);

impl PoolOrder {
    pub fn new(order: Vec<Variant>) -> Result<Self, PoolOrderError> {
        if order.is_empty() {
            return Err(PoolOrderError::Empty);
        }
        for (i, variant) in order.iter().enumerate() {
            if order[..i].contains(variant) {
                return Err(PoolOrderError::Duplicate(*variant));
            }
        }
        Ok(Self(order))
    }

    pub fn variants(&self) -> &[Variant] {
        &self.0
    }

    /// Position of a variant in the order, or None if it is not scanned
    pub fn position(&self, variant: Variant) -> Option<usize> {
        self.0.iter().position(|v| *v == variant)
    }
}

impl Default for PoolOrder {
    fn default() -> Self {
        Self(Variant::all().to_vec())
    }
}

impl TryFrom<Vec<Variant>> for PoolOrder {
    type Error = PoolOrderError;

    fn try_from(value: Vec<Variant>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PoolOrder> for Vec<Variant> {
    fn from(order: PoolOrder) -> Self {
        order.0
    }
}

/// Qualifier word per variant ("נוהל Alpha" qualifies "Alpha" as a procedure).
/// An empty qualifier disables the qualified form for that variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Qualifiers {
    pub procedure: String,
    pub system: String,
    pub script: String,
    pub article: String,
}

impl Qualifiers {
    pub fn get(&self, variant: Variant) -> &str {
        match variant {
            Variant::Procedure => &self.procedure,
            Variant::System => &self.system,
            Variant::Script => &self.script,
            Variant::Article => &self.article,
        }
    }
}

impl Default for Qualifiers {
    fn default() -> Self {
        Self {
            procedure: Variant::Procedure.default_qualifier().to_string(),
            system: Variant::System.default_qualifier().to_string(),
            script: Variant::Script.default_qualifier().to_string(),
            article: Variant::Article.default_qualifier().to_string(),
        }
    }
}

/// Link target route per variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routes {
    pub procedure: String,
    pub system: String,
    pub script: String,
    pub article: String,
}

impl Routes {
    pub fn get(&self, variant: Variant) -> &str {
        match variant {
            Variant::Procedure => &self.procedure,
            Variant::System => &self.system,
            Variant::Script => &self.script,
            Variant::Article => &self.article,
        }
    }
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            procedure: Variant::Procedure.default_route().to_string(),
            system: Variant::System.default_route().to_string(),
            script: Variant::Script.default_route().to_string(),
            article: Variant::Article.default_route().to_string(),
        }
    }
}

/// Cross-referencing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XrefSettings {
    /// Scan order of the pools (tie-break policy)
    pub pool_order: PoolOrder,

    /// Qualifier words recognized before a title
    pub qualifiers: Qualifiers,

    /// Routes links point at
    pub routes: Routes,

    /// CSS class on every generated link; `{class}-{type}` is added as well
    pub link_class: String,

    /// Leave existing markup in the input untouched
    pub guard_markup: bool,
}

impl Default for XrefSettings {
    fn default() -> Self {
        Self {
            pool_order: PoolOrder::default(),
            qualifiers: Qualifiers::default(),
            routes: Routes::default(),
            link_class: "smart-link".to_string(),
            guard_markup: true,
        }
    }
}
