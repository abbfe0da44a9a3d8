//! Domain models for the knowledge base
//!
//! Contains the content records and the pool snapshot, without any I/O.

mod id;
mod records;
mod snapshot;
mod variant;

pub use id::generate_id;
pub use records::{
    parse_keywords, ArticleCategory, ArticleStatus, ConversationScript, Entity,
    KnowledgeArticle, Procedure, ProcedureStatus, System,
};
pub use snapshot::Snapshot;
pub use variant::{Variant, VariantError};
