//! # Storage Layer
//!
//! Local, git-friendly persistence for the four entity pools.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Procedures | JSONL | `.kb/procedures.jsonl` |
//! | Systems | JSONL | `.kb/systems.jsonl` |
//! | Scripts | JSONL | `.kb/scripts.jsonl` |
//! | Articles | JSONL | `.kb/articles.jsonl` |
//! | Config | TOML | `.kb/config.toml` |
//! | Snapshots | JSON / YAML | anywhere, passed with `--snapshot` |
//!
//! ## Concurrency Safety
//!
//! - [`PoolStore`] uses file locking (`fs2`) for concurrent access
//! - Full rewrites are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a knowledge base
//! - [`PoolStore`] - Read/write one pool as JSONL
//! - [`Config`] - Project and global configuration

mod config;
mod jsonl;
mod project;
mod snapshot;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, KB_DIR, PROJECT_ENV};
pub use jsonl::{PoolStore, StoreError};
pub use project::{Project, ProjectError};
pub use snapshot::{load_snapshot, parse_snapshot, SnapshotError};
