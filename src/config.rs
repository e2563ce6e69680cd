//! Configuration file
//!
//! ```json
//! {
//!   "db_path": "./database.json",
//!   "jwt_secret": "...",
//!   "session_ttl_secs": 3600,
//!   "renewal_ttl_days": 60,
//!   "min_password_length": 1,
//!   "require_uppercase": false,
//!   "require_number": false
//! }
//! ```
//!
//! `jwt_secret` may be omitted, in which case it is read from the
//! `JWT_SECRET` environment variable.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{JwtConfig, PasswordPolicy, RenewalConfig};

/// Environment variable consulted when the file carries no secret
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Upper bound on `session_ttl_secs` (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Upper bound on `renewal_ttl_days` (ten years)
pub const MAX_RENEWAL_TTL_DAYS: u64 = 3650;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the document file (required)
    pub db_path: PathBuf,

    /// Session token signing secret
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Default and maximum session token lifetime
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Renewal token lifetime
    #[serde(default = "default_renewal_ttl_days")]
    pub renewal_ttl_days: u64,

    /// `iss` claim of session tokens
    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    #[serde(default)]
    pub require_uppercase: bool,

    #[serde(default)]
    pub require_number: bool,
}

fn default_session_ttl_secs() -> u64 {
    3600
}
fn default_renewal_ttl_days() -> u64 {
    60
}
fn default_issuer() -> String {
    "chirpy".to_string()
}
fn default_min_password_length() -> usize {
    1
}

impl Config {
    /// Configuration with defaults for everything but the path and secret
    pub fn new(db_path: impl Into<PathBuf>, jwt_secret: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            jwt_secret: Some(jwt_secret.into()),
            session_ttl_secs: default_session_ttl_secs(),
            renewal_ttl_days: default_renewal_ttl_days(),
            issuer: default_issuer(),
            min_password_length: default_min_password_length(),
            require_uppercase: false,
            require_number: false,
        }
    }

    /// Load, fill the secret from the environment if needed, validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.resolve_secret(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Fill a missing or empty secret using `lookup`
    pub fn resolve_secret(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let missing = self.jwt_secret.as_deref().map_or(true, str::is_empty);
        if missing {
            self.jwt_secret = lookup(JWT_SECRET_ENV);
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("db_path must not be empty".into()));
        }
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "jwt_secret missing (set it in the file or via {})",
                    JWT_SECRET_ENV
                )))
            }
        }
        if self.session_ttl_secs == 0 || self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "session_ttl_secs must be between 1 and {}",
                MAX_SESSION_TTL_SECS
            )));
        }
        if self.renewal_ttl_days == 0 || self.renewal_ttl_days > MAX_RENEWAL_TTL_DAYS {
            return Err(ConfigError::Invalid(format!(
                "renewal_ttl_days must be between 1 and {}",
                MAX_RENEWAL_TTL_DAYS
            )));
        }
        Ok(())
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone().unwrap_or_default(),
            default_ttl: Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64),
            issuer: self.issuer.clone(),
        }
    }

    pub fn renewal_config(&self) -> RenewalConfig {
        RenewalConfig {
            ttl: Duration::days(self.renewal_ttl_days.min(MAX_RENEWAL_TTL_DAYS) as i64),
        }
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_length: self.min_password_length,
            require_uppercase: self.require_uppercase,
            require_number: self.require_number,
        }
    }
}
