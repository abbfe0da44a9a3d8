//! Knowledge-base records
//!
//! The four content types the knowledge base stores. Only the id and the
//! title (or name, for systems) take part in cross-referencing; the other
//! fields are carried for listing, search and editing.
//!
//! Every field except the id and title defaults when absent, so hand-written
//! snapshot files can list entities as `{id, title}` pairs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::generate_id;
use super::Variant;

/// Capability shared by all records: something with an id and a name that
/// can be mentioned in prose
pub trait Entity {
    /// The pool this record type lives in
    const VARIANT: Variant;

    /// Opaque id, unique within the pool
    fn id(&self) -> &str;

    /// The matchable surface form (title or name)
    fn surface_title(&self) -> &str;

    /// Free-form text belonging to this record that may mention other entities
    fn body(&self) -> &str;

    /// Creation time, used for newest-first ordering
    fn created_at(&self) -> DateTime<Utc>;

    /// Case-insensitive search over the fields the record's list view filters on.
    /// `query` must already be lowercased.
    fn matches_query(&self, query: &str) -> bool;
}

fn contains_ci(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(query)
}

fn any_contains_ci(values: &[String], query: &str) -> bool {
    values.iter().any(|v| contains_ci(v, query))
}

/// Status of a procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureStatus {
    Draft,
    #[default]
    Active,
    Archived,
}

impl std::fmt::Display for ProcedureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcedureStatus::Draft => write!(f, "draft"),
            ProcedureStatus::Active => write!(f, "active"),
            ProcedureStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ProcedureStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ProcedureStatus::Draft),
            "active" => Ok(ProcedureStatus::Active),
            "archived" => Ok(ProcedureStatus::Archived),
            _ => Err(format!("Unknown procedure status: {}", s)),
        }
    }
}

/// Publication status of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleStatus::Draft => write!(f, "draft"),
            ArticleStatus::Published => write!(f, "published"),
            ArticleStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            "archived" => Ok(ArticleStatus::Archived),
            _ => Err(format!("Unknown article status: {}", s)),
        }
    }
}

/// Category an article is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArticleCategory {
    Products,
    Procedures,
    Faq,
    Support,
    #[default]
    General,
}

impl std::fmt::Display for ArticleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArticleCategory::Products => write!(f, "products"),
            ArticleCategory::Procedures => write!(f, "procedures"),
            ArticleCategory::Faq => write!(f, "faq"),
            ArticleCategory::Support => write!(f, "support"),
            ArticleCategory::General => write!(f, "general"),
        }
    }
}

impl std::str::FromStr for ArticleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "products" => Ok(ArticleCategory::Products),
            "procedures" => Ok(ArticleCategory::Procedures),
            "faq" => Ok(ArticleCategory::Faq),
            "support" => Ok(ArticleCategory::Support),
            "general" => Ok(ArticleCategory::General),
            _ => Err(format!("Unknown article category: {}", s)),
        }
    }
}

/// A work procedure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Procedure {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub version: String,
    pub status: ProcedureStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Procedure {
    /// Creates a new procedure with a generated id
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: generate_id(Variant::Procedure, &title, now),
            title,
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }
}

impl Entity for Procedure {
    const VARIANT: Variant = Variant::Procedure;

    fn id(&self) -> &str {
        &self.id
    }

    fn surface_title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.content
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches_query(&self, query: &str) -> bool {
        contains_ci(&self.title, query)
            || contains_ci(&self.description, query)
            || contains_ci(&self.content, query)
    }
}

/// An entry in the system registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct System {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub category: String,
    pub instructions: String,
    pub keywords: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl System {
    /// Creates a new system entry with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: generate_id(Variant::System, &name, now),
            name,
            category: "general".to_string(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }
}

impl Entity for System {
    const VARIANT: Variant = Variant::System;

    fn id(&self) -> &str {
        &self.id
    }

    fn surface_title(&self) -> &str {
        &self.name
    }

    fn body(&self) -> &str {
        &self.instructions
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches_query(&self, query: &str) -> bool {
        contains_ci(&self.name, query)
            || contains_ci(&self.description, query)
            || contains_ci(&self.instructions, query)
            || any_contains_ci(&self.keywords, query)
    }
}

/// A conversation script for a service scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationScript {
    pub id: String,
    pub title: String,
    pub scenario: String,
    pub script_content: String,
    pub tags: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationScript {
    /// Creates a new script with a generated id
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: generate_id(Variant::Script, &title, now),
            title,
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// Returns true if the script carries the given tag (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Entity for ConversationScript {
    const VARIANT: Variant = Variant::Script;

    fn id(&self) -> &str {
        &self.id
    }

    fn surface_title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.script_content
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches_query(&self, query: &str) -> bool {
        contains_ci(&self.title, query)
            || contains_ci(&self.scenario, query)
            || contains_ci(&self.script_content, query)
    }
}

/// A knowledge-base article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub category: ArticleCategory,
    pub status: ArticleStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeArticle {
    /// Creates a new published article with a generated id
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: generate_id(Variant::Article, &title, now),
            title,
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// Only published articles are visible to readers and linkable
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }
}

impl Entity for KnowledgeArticle {
    const VARIANT: Variant = Variant::Article;

    fn id(&self) -> &str {
        &self.id
    }

    fn surface_title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.content
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches_query(&self, query: &str) -> bool {
        contains_ci(&self.title, query)
            || contains_ci(&self.content, query)
            || any_contains_ci(&self.keywords, query)
    }
}

/// Splits a comma-separated keyword list, dropping blanks
pub fn parse_keywords(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_get_prefixed_ids() {
        assert!(Procedure::new("Refunds").id.starts_with("p-"));
        assert!(System::new("CRM").id.starts_with("s-"));
        assert!(ConversationScript::new("Greeting").id.starts_with("c-"));
        assert!(KnowledgeArticle::new("Returns").id.starts_with("k-"));
    }

    #[test]
    fn system_surface_title_is_its_name() {
        let system = System::new("CRM");
        assert_eq!(system.surface_title(), "CRM");
        assert_eq!(<System as Entity>::VARIANT, Variant::System);
    }

    #[test]
    fn system_search_covers_keywords() {
        let mut system = System::new("CRM");
        system.keywords = vec!["Customers".to_string()];

        assert!(system.matches_query("customers"));
        assert!(system.matches_query("crm"));
        assert!(!system.matches_query("billing"));
    }

    #[test]
    fn procedure_search_covers_description_and_content() {
        let mut proc = Procedure::new("Refunds");
        proc.description = "Handling money back".to_string();
        proc.content = "Open the ticket first".to_string();

        assert!(proc.matches_query("money"));
        assert!(proc.matches_query("ticket"));
        assert!(!proc.matches_query("invoice"));
    }

    #[test]
    fn snapshot_records_need_only_id_and_title() {
        let system: System = serde_json::from_str(r#"{"id":"s1","name":"CRM"}"#).unwrap();
        assert_eq!(system.id, "s1");
        assert_eq!(system.name, "CRM");
        assert!(system.keywords.is_empty());

        let article: KnowledgeArticle =
            serde_json::from_str(r#"{"id":"a1","title":"Returns"}"#).unwrap();
        assert!(article.is_published());
        assert_eq!(article.category, ArticleCategory::General);
    }

    #[test]
    fn parse_keywords_drops_blanks() {
        assert_eq!(parse_keywords(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_keywords("").is_empty());
    }

    #[test]
    fn statuses_parse_case_insensitively() {
        assert_eq!("DRAFT".parse::<ProcedureStatus>(), Ok(ProcedureStatus::Draft));
        assert_eq!("Faq".parse::<ArticleCategory>(), Ok(ArticleCategory::Faq));
        assert!("gone".parse::<ArticleStatus>().is_err());
    }
}
