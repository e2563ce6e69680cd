//! Repository errors

use thiserror::Error;

use crate::store::{EntityId, StoreError};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Input violates a stated constraint
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Point lookup missed
    #[error("No {collection} with id {id}")]
    NotFound {
        collection: &'static str,
        id: EntityId,
    },

    /// Email already belongs to another account
    #[error("Email already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    /// HTTP status a transport should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            RepositoryError::Validation(_) => 400,
            RepositoryError::NotFound { .. } => 404,
            RepositoryError::DuplicateEmail => 409,
            RepositoryError::Store(_) => 500,
        }
    }
}
