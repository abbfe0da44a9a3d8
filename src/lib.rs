//! kb-xref - Cross-referencing for a service-center knowledge base
//!
//! The knowledge base holds procedures, a system registry, conversation
//! scripts and articles. The [`xref`] engine scans the text of one item for
//! mentions of the others by name and either reports them or turns them into
//! links. The `kbx` binary wraps the engine with a local file-backed store.

pub mod domain;
pub mod xref;
pub mod storage;
pub mod cli;

pub use domain::{ConversationScript, Entity, KnowledgeArticle, Procedure, Snapshot, System, Variant};
pub use xref::{Gazetteer, Matcher, Reference, ReferencedItem, XrefSettings};
