//! Snapshot files
//!
//! `detect`, `refs` and `annotate` can read the four pools from a single
//! JSON or YAML file instead of a project store:
//!
//! ```yaml
//! procedures:
//!   - { id: p1, title: Onboarding }
//! systems:
//!   - { id: s1, name: CRM }
//! ```
//!
//! The pools are used in file order.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::Snapshot;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Unsupported snapshot format '{0}' (use .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

/// Parses snapshot text; `extension` picks the format
pub fn parse_snapshot(content: &str, extension: &str) -> Result<Snapshot> {
    match extension.to_lowercase().as_str() {
        "json" => serde_json::from_str(content).context("Failed to parse JSON snapshot"),
        "yaml" | "yml" => serde_yaml::from_str(content).context("Failed to parse YAML snapshot"),
        other => Err(SnapshotError::UnsupportedFormat(other.to_string()).into()),
    }
}

/// Reads a snapshot file
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;

    parse_snapshot(&content, extension)
        .with_context(|| format!("Invalid snapshot: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_json_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pools.json");
        fs::write(
            &path,
            r#"{"procedures":[{"id":"p1","title":"Onboarding"}],"systems":[{"id":"s1","name":"CRM"}],"scripts":[],"articles":[]}"#,
        )
        .unwrap();

        let snapshot = load_snapshot(&path).unwrap();
        assert_eq!(snapshot.procedures[0].title, "Onboarding");
        assert_eq!(snapshot.systems[0].name, "CRM");
    }

    #[test]
    fn loads_yaml_snapshot() {
        let snapshot = parse_snapshot("scripts:\n  - { id: c1, title: Greeting }\n", "YML").unwrap();
        assert_eq!(snapshot.scripts[0].id, "c1");
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_snapshot("", "csv").unwrap_err();
        assert!(err.downcast_ref::<SnapshotError>().is_some());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_snapshot(&dir.path().join("nope.json")).is_err());
    }
}
