//! Project management
//!
//! Handles knowledge-base initialization and provides access to the pool
//! stores and to ordered snapshots of their contents.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::KB_DIR;
use super::{Config, PoolStore};
use crate::domain::{ConversationScript, Entity, KnowledgeArticle, Procedure, Snapshot, System};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a knowledge base. Run 'kbx init' first.")]
    NotInProject,
}

const DEFAULT_CONFIG: &str = r#"# kbx configuration

# Link draft and archived articles as well as published ones
link_unpublished = false

[xref]
# Scan order of the pools; on overlapping mentions the earlier pool wins the link
pool_order = ["procedure", "system", "script", "article"]

# CSS class added to generated links (plus "<class>-<type>")
link_class = "smart-link"

# Never rewrite inside markup already present in the text
guard_markup = true

# Words that may precede a title, e.g. "נוהל <title>"
[xref.qualifiers]
procedure = "נוהל"
system = "מערכת"
script = "תסריט"
article = "מאמר"

[xref.routes]
procedure = "/procedures"
system = "/systems"
script = "/scripts"
article = "/knowledge"
"#;

/// A knowledge-base project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(KB_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at `$KBX_PROJECT`, the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path; existing files are kept
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let kb_dir = root.join(KB_DIR);

        fs::create_dir_all(&kb_dir)
            .with_context(|| format!("Failed to create {} directory: {}", KB_DIR, kb_dir.display()))?;

        let config_path = kb_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = kb_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = "# Interrupted pool rewrites and writer locks\n*.tmp\n*.lock\n";
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let project = Self::open(root)?;
        project.touch_pool(project.procedures().path())?;
        project.touch_pool(project.systems().path())?;
        project.touch_pool(project.scripts().path())?;
        project.touch_pool(project.articles().path())?;

        Ok(project)
    }

    fn touch_pool(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::write(path, "")
                .with_context(|| format!("Failed to create pool: {}", path.display()))?;
        }
        Ok(())
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .kb directory path
    pub fn kb_dir(&self) -> PathBuf {
        self.root.join(KB_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn procedures(&self) -> PoolStore<Procedure> {
        PoolStore::for_project(&self.root)
    }

    pub fn systems(&self) -> PoolStore<System> {
        PoolStore::for_project(&self.root)
    }

    pub fn scripts(&self) -> PoolStore<ConversationScript> {
        PoolStore::for_project(&self.root)
    }

    pub fn articles(&self) -> PoolStore<KnowledgeArticle> {
        PoolStore::for_project(&self.root)
    }

    /// Loads all pools in display order: procedures, scripts and articles
    /// newest first, systems by name. Unpublished articles are included only
    /// when `include_unpublished` is set.
    pub fn snapshot(&self, include_unpublished: bool) -> Result<Snapshot> {
        let mut procedures = self.procedures().read_all()?;
        newest_first(&mut procedures);

        let mut systems = self.systems().read_all()?;
        systems.sort_by(|a, b| a.name.cmp(&b.name));

        let mut scripts = self.scripts().read_all()?;
        newest_first(&mut scripts);

        let mut articles = self.articles().read_all()?;
        if !include_unpublished {
            articles.retain(KnowledgeArticle::is_published);
        }
        newest_first(&mut articles);

        Ok(Snapshot {
            procedures,
            systems,
            scripts,
            articles,
        })
    }

    /// The snapshot cross-references are computed against
    pub fn link_snapshot(&self) -> Result<Snapshot> {
        self.snapshot(self.config.project.link_unpublished)
    }
}

/// Stable sort, newest `created_at` first
fn newest_first<E: Entity>(entities: &mut [E]) {
    entities.sort_by_key(|e| std::cmp::Reverse(e.created_at()));
}
