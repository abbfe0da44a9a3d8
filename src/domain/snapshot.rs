//! Snapshot of the four entity pools
//!
//! A snapshot is what a caller has loaded at the moment it renders or
//! analyzes a piece of text. Order inside each pool is significant.

use serde::{Deserialize, Serialize};

use super::{ConversationScript, Entity, KnowledgeArticle, Procedure, System, Variant};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub procedures: Vec<Procedure>,
    pub systems: Vec<System>,
    pub scripts: Vec<ConversationScript>,
    pub articles: Vec<KnowledgeArticle>,
}

impl Snapshot {
    /// Returns true if all four pools are empty
    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
            && self.systems.is_empty()
            && self.scripts.is_empty()
            && self.articles.is_empty()
    }

    /// Total number of entities across all pools
    pub fn len(&self) -> usize {
        self.procedures.len() + self.systems.len() + self.scripts.len() + self.articles.len()
    }

    /// Removes one entity from its pool, so an item is not linked to itself.
    /// Returns true if something was removed.
    pub fn exclude(&mut self, variant: Variant, id: &str) -> bool {
        fn drop_id<E: Entity>(pool: &mut Vec<E>, id: &str) -> bool {
            let before = pool.len();
            pool.retain(|e| e.id() != id);
            pool.len() != before
        }

        match variant {
            Variant::Procedure => drop_id(&mut self.procedures, id),
            Variant::System => drop_id(&mut self.systems, id),
            Variant::Script => drop_id(&mut self.scripts, id),
            Variant::Article => drop_id(&mut self.articles, id),
        }
    }

    /// Looks up the body text of an entity
    pub fn body_of(&self, variant: Variant, id: &str) -> Option<&str> {
        fn find<'a, E: Entity>(pool: &'a [E], id: &str) -> Option<&'a str> {
            pool.iter().find(|e| e.id() == id).map(|e| e.body())
        }

        match variant {
            Variant::Procedure => find(&self.procedures, id),
            Variant::System => find(&self.systems, id),
            Variant::Script => find(&self.scripts, id),
            Variant::Article => find(&self.articles, id),
        }
    }
}
