//! # Cross-Referencing Engine
//!
//! Finds mentions of known entities (procedures, systems, scripts, articles)
//! in free-form text, and turns them into links.
//!
//! ## Pipeline
//!
//! ```text
//! Snapshot ──► Gazetteer ──compile──► Matcher ──► detect()   → Vec<Reference>
//!  (pools)     (ordered pools)        (patterns)  annotate() → String
//! ```
//!
//! - [`Gazetteer`] holds `(variant, pool)` pairs in [`PoolOrder`], the
//!   tie-break policy shared by detection and rewriting.
//! - [`Matcher`] owns one escaped, case-insensitive pattern per entity.
//!   Blank titles and patterns the engine rejects are skipped, never fatal.
//! - [`Matcher::detect`] reports each mentioned entity once.
//! - [`Matcher::annotate`] links every non-overlapping mention in one pass.
//!
//! Nothing here does I/O or keeps state between calls; a `Matcher` can be
//! shared across threads.

mod annotate;
mod detect;
mod gazetteer;
mod markup;
mod pattern;
mod settings;

pub use annotate::{rewrite, LinkSpan};
pub use detect::{Reference, ReferencedItem};
pub use gazetteer::{CompiledEntry, Gazetteer, GazetteerEntry, Matcher, SkippedEntry};
pub use markup::{escape_attr, link_target, render_link};
pub use pattern::{build_pattern, pattern_source, PatternError};
pub use settings::{PoolOrder, PoolOrderError, Qualifiers, Routes, XrefSettings};

use crate::domain::Snapshot;

/// Compiles a snapshot's pools under the given settings
pub fn compile(snapshot: &Snapshot, settings: &XrefSettings) -> Matcher {
    Gazetteer::from_snapshot(snapshot, &settings.pool_order).compile(&settings.qualifiers)
}

/// Detects references to snapshot entities in `text`
pub fn detect(text: &str, snapshot: &Snapshot, settings: &XrefSettings) -> Vec<Reference> {
    compile(snapshot, settings).detect(text)
}

/// Lists the items `text` refers to
pub fn referenced_items(
    text: &str,
    snapshot: &Snapshot,
    settings: &XrefSettings,
) -> Vec<ReferencedItem> {
    compile(snapshot, settings).referenced_items(text)
}

/// Links mentions of snapshot entities in `text`
pub fn annotate(text: &str, snapshot: &Snapshot, settings: &XrefSettings) -> String {
    compile(snapshot, settings).annotate(text, settings)
}
