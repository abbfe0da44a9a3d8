//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Knowledge base setup | `init` |
//! | Pools | Entity management | `procedure add`, `system list`, `article show` |
//! | Search | Finding entities | `search`, `search --type script --tag sales`, `stats` |
//! | Cross-ref | Mentions and links | `detect`, `refs`, `annotate` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed in the global `config.toml`.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! kbx --verbose annotate --file answer.html
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod entity;
mod output;
mod search;
mod stats;
mod xref_cmd;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
