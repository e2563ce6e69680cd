//! # Auth Module
//!
//! Password credentials, stateless session tokens and persisted renewal
//! tokens for chirpstore accounts.

pub mod credentials;
pub mod crypto;
pub mod errors;
pub mod jwt;
pub mod renewal;

pub use credentials::CredentialService;
pub use crypto::PasswordPolicy;
pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtConfig, JwtManager, SessionClaims};
pub use renewal::{RenewalConfig, RenewalTokenManager};
