//! Entity variants
//!
//! Every piece of content in the knowledge base belongs to exactly one of
//! four variants. The variant decides the default link route, the qualifier
//! word that may precede a title in prose, and the id prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VariantError {
    #[error("Unknown entity type: '{0}' (expected procedure, system, script or article)")]
    Unknown(String),
}

/// The four content categories an entity can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Procedure,
    System,
    Script,
    Article,
}

impl Variant {
    /// Returns all variants in the default pool order
    pub fn all() -> &'static [Variant] {
        &[
            Variant::Procedure,
            Variant::System,
            Variant::Script,
            Variant::Article,
        ]
    }

    /// Returns the type tag used in markup and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Procedure => "procedure",
            Variant::System => "system",
            Variant::Script => "script",
            Variant::Article => "article",
        }
    }

    /// Default route a link to this variant points at
    pub fn default_route(&self) -> &'static str {
        match self {
            Variant::Procedure => "/procedures",
            Variant::System => "/systems",
            Variant::Script => "/scripts",
            Variant::Article => "/knowledge",
        }
    }

    /// Default qualifier word that may precede a title ("נוהל X")
    pub fn default_qualifier(&self) -> &'static str {
        match self {
            Variant::Procedure => "נוהל",
            Variant::System => "מערכת",
            Variant::Script => "תסריט",
            Variant::Article => "מאמר",
        }
    }

    /// Prefix for generated ids
    pub fn id_prefix(&self) -> char {
        match self {
            Variant::Procedure => 'p',
            Variant::System => 's',
            Variant::Script => 'c',
            Variant::Article => 'k',
        }
    }

    /// Name of the JSONL file holding this variant's pool
    pub fn pool_file(&self) -> &'static str {
        match self {
            Variant::Procedure => "procedures.jsonl",
            Variant::System => "systems.jsonl",
            Variant::Script => "scripts.jsonl",
            Variant::Article => "articles.jsonl",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "procedure" | "procedures" | "proc" => Ok(Variant::Procedure),
            "system" | "systems" | "sys" => Ok(Variant::System),
            "script" | "scripts" | "conversation_script" => Ok(Variant::Script),
            "article" | "articles" | "knowledge" => Ok(Variant::Article),
            _ => Err(VariantError::Unknown(s.to_string())),
        }
    }
}
