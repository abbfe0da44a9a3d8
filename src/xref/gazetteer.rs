//! Gazetteer: the known names text is matched against
//!
//! A [`Gazetteer`] is an ordered list of `(variant, pool)` pairs. The order
//! comes from a [`PoolOrder`] and is the tie-break policy used by both the
//! detector and the link rewriter. Compiling a gazetteer yields a
//! [`Matcher`], which owns one escaped pattern per usable entry.

use std::collections::BTreeMap;

use regex::Regex;

use super::pattern::{build_pattern, PatternError};
use super::settings::{PoolOrder, Qualifiers};
use crate::domain::{Entity, Snapshot, Variant};

/// A name the gazetteer knows about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GazetteerEntry {
    pub id: String,
    pub title: String,
}

impl GazetteerEntry {
    fn from_entity<E: Entity>(entity: &E) -> Self {
        Self {
            id: entity.id().to_string(),
            title: entity.surface_title().to_string(),
        }
    }
}

/// Ordered collection of entity names from the four pools
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    order: PoolOrder,
    pools: BTreeMap<Variant, Vec<GazetteerEntry>>,
}

impl Gazetteer {
    /// Creates an empty gazetteer scanning pools in the given order
    pub fn new(order: PoolOrder) -> Self {
        Self {
            order,
            pools: BTreeMap::new(),
        }
    }

    /// Builds a gazetteer from all four pools of a snapshot
    pub fn from_snapshot(snapshot: &Snapshot, order: &PoolOrder) -> Self {
        Self::new(order.clone())
            .with_pool(&snapshot.procedures)
            .with_pool(&snapshot.systems)
            .with_pool(&snapshot.scripts)
            .with_pool(&snapshot.articles)
    }

    /// Sets the pool for `E`'s variant, keeping the given order
    pub fn with_pool<E: Entity>(mut self, entities: &[E]) -> Self {
        let entries = entities.iter().map(GazetteerEntry::from_entity).collect();
        self.pools.insert(E::VARIANT, entries);
        self
    }

    /// Sets a pool from raw `(id, title)` pairs
    pub fn set_pool<I, S, T>(&mut self, variant: Variant, entries: I)
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(id, title)| GazetteerEntry {
                id: id.into(),
                title: title.into(),
            })
            .collect();
        self.pools.insert(variant, entries);
    }

    /// Returns the scan order
    pub fn order(&self) -> &PoolOrder {
        &self.order
    }

    /// Iterates pools in scan order. Variants missing from the order are skipped.
    pub fn pools(&self) -> impl Iterator<Item = (Variant, &[GazetteerEntry])> + '_ {
        self.order.variants().iter().map(move |variant| {
            let entries = self.pools.get(variant).map(Vec::as_slice).unwrap_or(&[]);
            (*variant, entries)
        })
    }

    /// Number of entries that will be scanned
    pub fn len(&self) -> usize {
        self.pools().map(|(_, entries)| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compiles one pattern per entry. Entries whose pattern cannot be built
    /// are set aside in [`Matcher::skipped`] and never match.
    pub fn compile(&self, qualifiers: &Qualifiers) -> Matcher {
        let mut entries = Vec::with_capacity(self.len());
        let mut skipped = Vec::new();

        for (variant, pool) in self.pools() {
            let qualifier = qualifiers.get(variant);
            for entry in pool {
                let compiled = build_pattern(&entry.title, qualifier).and_then(|regex| {
                    // The qualified pattern can claim a span the bare title alone would not
                    let bare = if qualifier.trim().is_empty() {
                        None
                    } else {
                        Some(build_pattern(&entry.title, "")?)
                    };
                    Ok((regex, bare))
                });
                match compiled {
                    Ok((regex, bare)) => entries.push(CompiledEntry {
                        variant,
                        id: entry.id.clone(),
                        title: entry.title.clone(),
                        regex,
                        bare,
                    }),
                    Err(reason) => skipped.push(SkippedEntry {
                        variant,
                        id: entry.id.clone(),
                        title: entry.title.clone(),
                        reason,
                    }),
                }
            }
        }

        Matcher { entries, skipped }
    }
}

/// An entry with its compiled pattern
#[derive(Debug, Clone)]
pub struct CompiledEntry {
    pub variant: Variant,
    pub id: String,
    pub title: String,
    pub(crate) regex: Regex,
    /// Title without its qualifier, when the variant has one
    pub(crate) bare: Option<Regex>,
}

/// An entry that contributes no matches, with the reason why
#[derive(Debug)]
pub struct SkippedEntry {
    pub variant: Variant,
    pub id: String,
    pub title: String,
    pub reason: PatternError,
}

/// A compiled gazetteer snapshot, ready to scan text
#[derive(Debug)]
pub struct Matcher {
    entries: Vec<CompiledEntry>,
    skipped: Vec<SkippedEntry>,
}

impl Matcher {
    /// Compiled entries in scan order
    pub fn entries(&self) -> &[CompiledEntry] {
        &self.entries
    }

    /// Entries that were left out (blank titles, engine rejections)
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Procedure, System};

    fn procedure(id: &str, title: &str) -> Procedure {
        Procedure {
            id: id.to_string(),
            title: title.to_string(),
            ..Procedure::default()
        }
    }

    #[test]
    fn pools_follow_the_configured_order() {
        let order = PoolOrder::new(vec![Variant::System, Variant::Procedure]).unwrap();
        let mut gazetteer = Gazetteer::new(order).with_pool(&[procedure("p1", "Alpha")]);
        gazetteer.set_pool(Variant::System, [("s1", "CRM")]);

        let variants: Vec<_> = gazetteer.pools().map(|(v, _)| v).collect();
        assert_eq!(variants, vec![Variant::System, Variant::Procedure]);
    }

    #[test]
    fn variants_outside_the_order_are_not_scanned() {
        let order = PoolOrder::new(vec![Variant::Procedure]).unwrap();
        let gazetteer = Gazetteer::new(order)
            .with_pool(&[procedure("p1", "Alpha")])
            .with_pool(&[System {
                id: "s1".to_string(),
                name: "CRM".to_string(),
                ..System::default()
            }]);

        assert_eq!(gazetteer.len(), 1);
        assert_eq!(gazetteer.compile(&Qualifiers::default()).entries().len(), 1);
    }

    #[test]
    fn blank_titles_are_skipped_not_compiled() {
        let gazetteer = Gazetteer::default()
            .with_pool(&[procedure("p1", ""), procedure("p2", "  "), procedure("p3", "Alpha")]);

        let matcher = gazetteer.compile(&Qualifiers::default());
        assert_eq!(matcher.entries().len(), 1);
        assert_eq!(matcher.entries()[0].id, "p3");
        assert_eq!(matcher.skipped().len(), 2);
        assert!(matches!(matcher.skipped()[0].reason, PatternError::EmptyTitle));
    }

    #[test]
    fn intra_pool_order_is_preserved() {
        let gazetteer = Gazetteer::default().with_pool(&[
            procedure("p2", "Beta"),
            procedure("p1", "Alpha"),
        ]);

        let ids: Vec<_> = gazetteer
            .compile(&Qualifiers::default())
            .entries()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }
}
