//! Observable events
//!
//! Events are explicit and typed; each maps to one stable log name.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Store
    /// Backing file created with an empty document
    StoreInitialized,
    /// A store operation failed
    StoreFailed,

    // Posts
    /// Post persisted
    PostCreated,
    /// Post rejected by validation
    PostRejected,

    // Accounts
    /// Account registered
    AccountRegistered,
    /// Email or password changed
    CredentialsUpdated,

    // Sessions
    /// Login succeeded
    LoginSucceeded,
    /// Login failed (unknown email or wrong password)
    LoginFailed,
    /// Session token minted from a renewal token
    SessionRenewed,
    /// Renewal token exchange refused
    SessionRenewRejected,

    // Renewal tokens
    /// New renewal token stored
    RenewalTokenIssued,
    /// Renewal token removed
    RenewalTokenRevoked,
    /// Expired renewal tokens purged
    RenewalTokensPurged,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::StoreInitialized => "STORE_INITIALIZED",
            Event::StoreFailed => "STORE_FAILED",

            Event::PostCreated => "POST_CREATED",
            Event::PostRejected => "POST_REJECTED",

            Event::AccountRegistered => "ACCOUNT_REGISTERED",
            Event::CredentialsUpdated => "CREDENTIALS_UPDATED",

            Event::LoginSucceeded => "LOGIN_SUCCEEDED",
            Event::LoginFailed => "LOGIN_FAILED",
            Event::SessionRenewed => "SESSION_RENEWED",
            Event::SessionRenewRejected => "SESSION_RENEW_REJECTED",

            Event::RenewalTokenIssued => "RENEWAL_TOKEN_ISSUED",
            Event::RenewalTokenRevoked => "RENEWAL_TOKEN_REVOKED",
            Event::RenewalTokensPurged => "RENEWAL_TOKENS_PURGED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreFailed => Severity::Error,
            Event::LoginFailed | Event::SessionRenewRejected | Event::PostRejected => {
                Severity::Warn
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
