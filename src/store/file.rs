//! Whole-document load and replace on the backing file
//!
//! Replace never writes in place: the new document goes to a sibling temp
//! file which is fsynced and then renamed over the target, so a failed
//! write leaves the previous document intact.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};

use super::document::Document;
use super::errors::{StoreError, StoreResult};

/// Handle on the file holding the document
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document.
    ///
    /// A missing file yields an empty document and initializes the file
    /// with it. An existing file that fails to decode is an error and is
    /// left untouched.
    pub fn load(&self) -> StoreResult<Document> {
        match fs::read(&self.path) {
            Ok(bytes) => Document::from_json(&bytes).map_err(|e| {
                StoreError::decode_failed(format!(
                    "invalid document at {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let doc = Document::empty();
                self.initialize(&doc)?;
                Ok(doc)
            }
            Err(e) => Err(StoreError::io_error(
                format!("failed to read {}", self.path.display()),
                e,
            )),
        }
    }

    /// Create the file if absent. Returns whether this call created it.
    pub fn ensure_exists(&self) -> StoreResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.initialize(&Document::empty())
    }

    /// Serialize and atomically overwrite the stored document
    pub fn replace(&self, doc: &Document) -> StoreResult<()> {
        let bytes = doc
            .to_json()
            .map_err(|e| StoreError::encode_failed(format!("failed to encode document: {}", e)))?;

        let tmp = self.temp_path();
        let result = write_synced(&tmp, &bytes)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                StoreError::io_error(format!("failed to replace {}", self.path.display()), e)
            });

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
            return result;
        }

        sync_parent_dir(&self.path);
        Ok(())
    }

    /// Write `doc` only if no file exists yet.
    ///
    /// The content is staged in a temp file and hard-linked into place,
    /// which fails rather than overwriting when the target exists.
    fn initialize(&self, doc: &Document) -> StoreResult<bool> {
        let bytes = doc
            .to_json()
            .map_err(|e| StoreError::encode_failed(format!("failed to encode document: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::io_error(format!("failed to create {}", parent.display()), e)
                })?;
            }
        }

        let tmp = self.temp_path();
        write_synced(&tmp, &bytes).map_err(|e| {
            StoreError::io_error(format!("failed to stage {}", tmp.display()), e)
        })?;

        let linked = fs::hard_link(&tmp, &self.path);
        let _ = fs::remove_file(&tmp);

        match linked {
            Ok(()) => {
                sync_parent_dir(&self.path);
                let path = self.path.display().to_string();
                log_event_with_fields(Event::StoreInitialized, &[("path", path.as_str())]);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(StoreError::io_error(
                format!("failed to initialize {}", self.path.display()),
                e,
            )),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        let dir = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(handle) = File::open(dir) {
            let _ = handle.sync_all();
        }
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}
