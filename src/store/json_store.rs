//! JsonStore - initiative record CRUD

use crate::error::CoreError;
use crate::models::Initiative;
use anyhow::{Context, Result};
use std::path::PathBuf;
use uuid::Uuid;

/// File-backed store for initiative records
pub struct JsonStore {
    path: PathBuf,
    items: Vec<Initiative>,
    dirty: bool,
}

impl JsonStore {
    /// Load the store, or start empty when the file does not exist yet
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let items = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            items,
            dirty: false,
        })
    }

    /// Persist all records as a pretty-printed JSON array
    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content =
            serde_json::to_string_pretty(&self.items).context("Failed to serialize store")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        self.dirty = false;
        Ok(())
    }

    /// Save only if mutated since the last save
    pub fn save_if_dirty(&mut self) -> Result<()> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Initiative] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Initiative> {
        self.items.iter()
    }

    /// All records matching a predicate
    pub fn find(&self, predicate: impl Fn(&Initiative) -> bool) -> Vec<&Initiative> {
        self.items.iter().filter(|item| predicate(item)).collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&Initiative> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn insert(&mut self, item: Initiative) -> &Initiative {
        self.items.push(item);
        self.dirty = true;
        self.items.last().expect("just inserted")
    }

    /// Mutate a record in place; returns the updated copy
    pub fn update(
        &mut self,
        id: Uuid,
        f: impl FnOnce(&mut Initiative),
    ) -> std::result::Result<Initiative, CoreError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CoreError::NotFound(id))?;

        f(item);
        self.dirty = true;
        Ok(item.clone())
    }

    /// Drop all records (bulk import with `--clear`)
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.dirty = true;
        }
    }
}
