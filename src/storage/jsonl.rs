//! JSONL storage for entity pools
//!
//! Each pool lives in its own file under `.kb/` (`procedures.jsonl`,
//! `systems.jsonl`, ...), one JSON object per line. Reads take a shared
//! lock on the pool file. Every write holds an exclusive lock on a sidecar
//! `<pool>.lock` file for its whole read-modify-write cycle, so concurrent
//! writers are serialized; full rewrites go through a temp file and an
//! atomic rename.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::config::KB_DIR;
use crate::domain::{Entity, Variant};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No {variant} with id '{id}'")]
    NotFound { variant: Variant, id: String },

    #[error("A {variant} with id '{id}' already exists")]
    DuplicateId { variant: Variant, id: String },
}

/// Store for one entity pool in JSONL format
pub struct PoolStore<E> {
    path: PathBuf,
    _entity: PhantomData<E>,
}

impl<E> PoolStore<E>
where
    E: Entity + Clone + Serialize + DeserializeOwned,
{
    /// Creates a new pool store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entity: PhantomData,
        }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(KB_DIR).join(E::VARIANT.pool_file()))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole pool in file order. A later line with an id seen
    /// before replaces the earlier record in place.
    pub fn read_all(&self) -> Result<Vec<E>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open pool: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on pool")?;

        let reader = BufReader::new(&file);
        let mut entities: Vec<E> = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let entity: E = serde_json::from_str(&line).with_context(|| {
                format!(
                    "Failed to parse {} at {}:{}",
                    E::VARIANT,
                    self.path.display(),
                    line_num + 1
                )
            })?;

            match entities.iter_mut().find(|e| e.id() == entity.id()) {
                Some(existing) => *existing = entity,
                None => entities.push(entity),
            }
        }

        Ok(entities)
    }

    /// Finds one entity by id
    pub fn get(&self, id: &str) -> Result<Option<E>> {
        Ok(self.read_all()?.into_iter().find(|e| e.id() == id))
    }

    /// Finds one entity by id, failing if it does not exist
    pub fn require(&self, id: &str) -> Result<E> {
        self.get(id)?.ok_or_else(|| {
            StoreError::NotFound {
                variant: E::VARIANT,
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Writes the whole pool (full rewrite, order preserved)
    pub fn write_all(&self, entities: &[E]) -> Result<()> {
        let _writer = self.lock_writers()?;
        self.replace(entities)
    }

    /// Path of the sidecar file writers lock
    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Blocks until no other writer holds the pool. The lock is released
    /// when the returned file is dropped.
    fn lock_writers(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on pool")?;

        Ok(file)
    }

    /// Rewrites the pool through a temp file; the caller holds the writer lock
    fn replace(&self, entities: &[E]) -> Result<()> {
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);

            for entity in entities {
                let line = serde_json::to_string(entity)
                    .with_context(|| format!("Failed to serialize {}", E::VARIANT))?;
                writeln!(writer, "{}", line)
                    .with_context(|| format!("Failed to write {}", E::VARIANT))?;
            }

            writer.flush().context("Failed to flush pool")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Appends a new entity; its id must not be taken yet
    pub fn insert(&self, entity: &E) -> Result<()> {
        let _writer = self.lock_writers()?;

        if self.get(entity.id())?.is_some() {
            return Err(StoreError::DuplicateId {
                variant: E::VARIANT,
                id: entity.id().to_string(),
            }
            .into());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open pool: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on pool")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(entity)
            .with_context(|| format!("Failed to serialize {}", E::VARIANT))?;
        writeln!(writer, "{}", line).with_context(|| format!("Failed to write {}", E::VARIANT))?;

        writer.flush().context("Failed to flush pool")?;

        Ok(())
    }

    /// Applies `edit` to one entity and writes the pool back
    pub fn update<F>(&self, id: &str, edit: F) -> Result<E>
    where
        F: FnOnce(&mut E),
    {
        let _writer = self.lock_writers()?;
        let mut entities = self.read_all()?;
        let entity = entities
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                variant: E::VARIANT,
                id: id.to_string(),
            })?;

        edit(entity);
        let updated = entity.clone();
        self.replace(&entities)?;
        Ok(updated)
    }

    /// Removes an entity by id, returning it
    pub fn remove(&self, id: &str) -> Result<E> {
        let _writer = self.lock_writers()?;
        let mut entities = self.read_all()?;
        let index = entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                variant: E::VARIANT,
                id: id.to_string(),
            })?;

        let removed = entities.remove(index);
        self.replace(&entities)?;
        Ok(removed)
    }
}
