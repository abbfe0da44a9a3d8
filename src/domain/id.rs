//! Entity id generation
//!
//! Ids minted by `kbx` have the format `{prefix}-{7-char-hash}`
//! (e.g. `p-7f2b4c1` for a procedure). The hash is derived from the title
//! and creation timestamp, so the same title created twice gets two ids.
//!
//! Ids coming from snapshot files are opaque and accepted verbatim; they are
//! only required to be unique within their own pool.

use chrono::{DateTime, Utc};

use super::Variant;

/// Generates a 7-character hash from title and timestamp
fn generate_hash(title: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", title, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Mints a new id for an entity of the given variant
pub fn generate_id(variant: Variant, title: &str, timestamp: DateTime<Utc>) -> String {
    format!("{}-{}", variant.id_prefix(), generate_hash(title, timestamp))
}
