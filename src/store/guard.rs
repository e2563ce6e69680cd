//! Transaction guard over the document file
//!
//! Every logical operation runs as one critical section: the write lock
//! is held across load, mutation and replace, so two concurrent writers
//! can never both observe the same snapshot.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::document::Document;
use super::errors::{StoreError, StoreResult};
use super::file::DocumentFile;

/// Serialized access to the single persisted document
#[derive(Debug)]
pub struct Store {
    file: RwLock<DocumentFile>,
    path: PathBuf,
}

impl Store {
    /// Open the store at `path`, creating an empty document if absent
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let file = DocumentFile::new(path.clone());
        file.ensure_exists()?;
        Ok(Self {
            file: RwLock::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against a consistent snapshot under the shared lock
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let file = self.file.read().map_err(|_| StoreError::lock_poisoned())?;
        let doc = file.load()?;
        f(&doc)
    }

    /// Run a read-modify-write unit under the exclusive lock.
    ///
    /// The document is written back only if `f` succeeds; on error the
    /// stored document is unchanged.
    pub fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let file = self.file.write().map_err(|_| StoreError::lock_poisoned())?;
        let mut doc = file.load()?;
        let out = f(&mut doc)?;
        file.replace(&doc)?;
        Ok(out)
    }

    /// Load a full copy of the document
    pub fn snapshot(&self) -> StoreResult<Document> {
        self.read(|doc| Ok(doc.clone()))
    }
}
