//! # Session Tokens
//!
//! HS256 JSON Web Tokens proving an account's identity for a bounded
//! period. Nothing about a session token is persisted; validation needs
//! only the signing secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::store::EntityId;

use super::errors::{AuthError, AuthResult};

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account id, decimal)
    pub sub: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing
    pub secret: String,

    /// Lifetime used when the caller asks for none, and the upper bound
    /// on any requested lifetime
    pub default_ttl: Duration,

    /// Issuer identifier
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string(),
            default_ttl: Duration::hours(1),
            issuer: "chirpy".to_string(),
        }
    }
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.config.issuer)
            .field("default_ttl", &self.config.default_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Create a new JWT manager with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.config.default_ttl
    }

    /// Lifetime actually granted for a requested one.
    ///
    /// Absent, zero or negative requests get the default; anything longer
    /// than the default is capped to it.
    pub fn effective_ttl(&self, requested: Option<Duration>) -> Duration {
        match requested {
            Some(ttl) if ttl > Duration::zero() => ttl.min(self.config.default_ttl),
            _ => self.config.default_ttl,
        }
    }

    /// Lifetime for a request given in seconds.
    ///
    /// Clamped to `0..=default` before conversion, so no input can
    /// overflow the duration type.
    pub fn ttl_from_secs(&self, secs: i64) -> Duration {
        let max = self.config.default_ttl.num_seconds().max(0);
        Duration::seconds(secs.clamp(0, max))
    }

    /// Issue a signed session token for an account
    pub fn issue(&self, account_id: EntityId, requested_ttl: Option<Duration>) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.effective_ttl(requested_ttl))
            .ok_or(AuthError::TokenGenerationFailed)?;

        let claims = SessionClaims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate a token and return its claims
    ///
    /// Expiry is checked with zero leeway.
    pub fn decode_claims(&self, token: &str) -> AuthResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Validate a token and return the account id it was issued to
    pub fn verify(&self, token: &str) -> AuthResult<EntityId> {
        let claims = self.decode_claims(token)?;
        claims.sub.parse().map_err(|_| AuthError::MalformedToken)
    }
}
