//! Store error types
//!
//! Error codes:
//! - CHIRP_STORE_IO_ERROR
//! - CHIRP_STORE_ENCODE_FAILED
//! - CHIRP_STORE_DECODE_FAILED
//! - CHIRP_STORE_LOCK_POISONED

use std::fmt;
use std::io;

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Reading, writing, or renaming the backing file failed
    Io,
    /// The document could not be serialized
    Encode,
    /// The backing file does not hold a valid document
    Decode,
    /// A thread panicked while holding the transaction guard
    LockPoisoned,
}

impl StoreErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::Io => "CHIRP_STORE_IO_ERROR",
            StoreErrorCode::Encode => "CHIRP_STORE_ENCODE_FAILED",
            StoreErrorCode::Decode => "CHIRP_STORE_DECODE_FAILED",
            StoreErrorCode::LockPoisoned => "CHIRP_STORE_LOCK_POISONED",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with code, message and optional I/O cause
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl StoreError {
    /// I/O failure on the backing file
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::Io,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Serialization failure
    pub fn encode_failed(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::Encode,
            message: message.into(),
            source: None,
        }
    }

    /// Deserialization failure
    pub fn decode_failed(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::Decode,
            message: message.into(),
            source: None,
        }
    }

    /// Poisoned transaction guard
    pub fn lock_poisoned() -> Self {
        Self {
            code: StoreErrorCode::LockPoisoned,
            message: "transaction guard poisoned".to_string(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
