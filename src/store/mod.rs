//! File-backed document store
//!
//! One JSON document holds every collection. Access goes through
//! [`Store`], whose lock spans each read-modify-write unit.
//!
//! # Guarantees
//!
//! - Missing file → empty document, created once, never overwritten
//! - Replace is write-temp, fsync, rename
//! - A failed transaction leaves the stored document unchanged
//! - Only intra-process access is serialized

mod document;
mod errors;
mod file;
mod guard;

pub use document::{Account, Document, EntityId, Post, RenewalToken, Sequences};
pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use file::DocumentFile;
pub use guard::Store;
