//! Configuration handling for kbx
//!
//! Configuration is stored in `.kb/config.toml` (project) and
//! `~/.config/kbx/config.toml` (global). The project root can be forced with
//! the `KBX_PROJECT` environment variable.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::xref::XrefSettings;

/// Name of the per-project data directory
pub const KB_DIR: &str = ".kb";

/// Environment variable overriding project discovery
pub const PROJECT_ENV: &str = "KBX_PROJECT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    /// Link draft and archived articles too (only published ones by default)
    pub link_unpublished: bool,

    /// Cross-referencing settings
    pub xref: XrefSettings,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self { project, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "kbx", "kbx").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(KB_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        Self::parse_project_config(&content).context("Failed to parse project config")
    }

    /// Parses and validates project configuration text
    pub fn parse_project_config(content: &str) -> Result<ProjectConfig, ConfigError> {
        let config: ProjectConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.xref.link_class.trim().is_empty() {
            return Err(ConfigError::Invalid("xref.link_class must not be empty".to_string()));
        }
        if let Some(variant) = crate::domain::Variant::all()
            .iter()
            .find(|v| config.xref.routes.get(**v).trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "xref.routes.{} must not be empty",
                variant
            )));
        }

        Ok(config)
    }

    /// Finds the project root: `$KBX_PROJECT` if set, otherwise the nearest
    /// directory containing `.kb/`, starting at the current directory
    pub fn find_project_root() -> Option<PathBuf> {
        if let Some(root) = std::env::var_os(PROJECT_ENV) {
            let root = PathBuf::from(root);
            return root.join(KB_DIR).is_dir().then_some(root);
        }

        Self::find_project_root_from(&std::env::current_dir().ok()?)
    }

    /// Walks up from `start` looking for a `.kb/` directory
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(KB_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}
