//! Errors surfaced at the service boundary

use thiserror::Error;

use crate::auth::AuthError;
use crate::repository::RepositoryError;
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status a transport should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Auth(e) => e.status_code(),
            ApiError::Repository(e) => e.status_code(),
            ApiError::Store(_) => 500,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Auth(AuthError::InvalidCredentials) => "INVALID_CREDENTIALS",
            ApiError::Auth(AuthError::EmailAlreadyExists)
            | ApiError::Repository(RepositoryError::DuplicateEmail) => "DUPLICATE_EMAIL",
            ApiError::Auth(AuthError::AccountNotFound)
            | ApiError::Repository(RepositoryError::NotFound { .. }) => "NOT_FOUND",
            ApiError::Auth(AuthError::WeakPassword(_))
            | ApiError::Repository(RepositoryError::Validation(_)) => "VALIDATION_ERROR",
            ApiError::Auth(AuthError::InvalidToken) => "INVALID_TOKEN",
            ApiError::Auth(AuthError::TokenExpired) => "TOKEN_EXPIRED",
            ApiError::Auth(AuthError::InvalidSignature) => "INVALID_SIGNATURE",
            ApiError::Auth(AuthError::MalformedToken) => "MALFORMED_TOKEN",
            ApiError::Auth(_) | ApiError::Repository(_) | ApiError::Store(_) => "INTERNAL_ERROR",
        }
    }
}
