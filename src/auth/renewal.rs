//! # Renewal Tokens
//!
//! Long-lived opaque tokens exchanged for fresh session tokens without
//! re-entering a password. Stored in the document's `renewal_tokens`
//! collection.
//!
//! Per account: absent → active → (renewed | revoked | expired).
//!
//! - At most one token per account; issuing replaces any prior entry
//! - Expired tokens behave exactly like absent ones
//! - Exchange does not rotate or consume the token

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::observability::{log_event_with_fields, Event};
use crate::store::{Document, EntityId, RenewalToken, Store};

use super::crypto::{constant_time_str_eq, generate_token, token_fingerprint};
use super::errors::{AuthError, AuthResult};
use super::jwt::JwtManager;

/// Renewal token manager configuration
#[derive(Debug, Clone)]
pub struct RenewalConfig {
    /// Renewal token lifetime
    pub ttl: Duration,
}

impl Default for RenewalConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::days(60),
        }
    }
}

/// Issues, exchanges and revokes renewal tokens
#[derive(Debug, Clone)]
pub struct RenewalTokenManager {
    config: RenewalConfig,
    store: Arc<Store>,
}

impl RenewalTokenManager {
    pub fn new(config: RenewalConfig, store: Arc<Store>) -> Self {
        Self { config, store }
    }

    /// Return the account's active token, or issue a new one
    pub fn get_or_issue(&self, account_id: EntityId) -> AuthResult<RenewalToken> {
        let (token, issued) = self
            .store
            .transact(|doc| self.get_or_issue_in(doc, account_id, Utc::now()))?;

        if issued {
            let fp = token_fingerprint(&token.token);
            let owner = account_id.to_string();
            log_event_with_fields(
                Event::RenewalTokenIssued,
                &[("account_id", owner.as_str()), ("token_fp", fp.as_str())],
            );
        }
        Ok(token)
    }

    /// In-transaction form of [`get_or_issue`](Self::get_or_issue).
    ///
    /// Returns the token and whether it was newly issued.
    pub fn get_or_issue_in(
        &self,
        doc: &mut Document,
        account_id: EntityId,
        now: DateTime<Utc>,
    ) -> AuthResult<(RenewalToken, bool)> {
        if !doc.accounts.contains_key(&account_id) {
            return Err(AuthError::AccountNotFound);
        }

        if let Some(existing) = doc
            .renewal_tokens
            .values()
            .find(|t| t.owner_id == account_id && t.is_active_at(now))
        {
            return Ok((existing.clone(), false));
        }

        let expires_at = now
            .checked_add_signed(self.config.ttl)
            .ok_or(AuthError::TokenGenerationFailed)?;
        let token = RenewalToken {
            owner_id: account_id,
            token: generate_token(),
            expires_at,
        };
        Self::revoke_all_in(doc, account_id);
        doc.renewal_tokens.insert(account_id, token.clone());
        Ok((token, true))
    }

    /// Look up an active token by value
    pub fn validate(&self, token: &str) -> AuthResult<RenewalToken> {
        self.store
            .read(|doc| Self::find_active_in(doc, token, Utc::now()).ok_or(AuthError::InvalidToken))
    }

    /// Trade an active renewal token for a new session token.
    ///
    /// The renewal token stays valid for further exchanges.
    pub fn exchange(&self, token: &str, jwt: &JwtManager) -> AuthResult<String> {
        let entry = self.validate(token)?;
        let session = jwt.issue(entry.owner_id, None)?;

        let owner = entry.owner_id.to_string();
        log_event_with_fields(Event::SessionRenewed, &[("account_id", owner.as_str())]);
        Ok(session)
    }

    /// Remove the token if present. Unknown tokens are not an error.
    pub fn revoke(&self, token: &str) -> AuthResult<()> {
        let removed = self.store.transact(|doc| -> AuthResult<usize> {
            let before = doc.renewal_tokens.len();
            doc.renewal_tokens
                .retain(|_, t| !constant_time_str_eq(&t.token, token));
            Ok(before - doc.renewal_tokens.len())
        })?;

        if removed > 0 {
            let fp = token_fingerprint(token);
            log_event_with_fields(Event::RenewalTokenRevoked, &[("token_fp", fp.as_str())]);
        }
        Ok(())
    }

    /// Remove every token owned by `account_id`. Returns how many.
    pub fn revoke_all_in(doc: &mut Document, account_id: EntityId) -> usize {
        let before = doc.renewal_tokens.len();
        doc.renewal_tokens.retain(|_, t| t.owner_id != account_id);
        before - doc.renewal_tokens.len()
    }

    /// Delete expired tokens. Returns how many were removed.
    pub fn purge_expired(&self) -> AuthResult<usize> {
        let now = Utc::now();
        self.store.transact(|doc| {
            let before = doc.renewal_tokens.len();
            doc.renewal_tokens.retain(|_, t| t.is_active_at(now));
            Ok(before - doc.renewal_tokens.len())
        })
    }

    fn find_active_in(doc: &Document, token: &str, now: DateTime<Utc>) -> Option<RenewalToken> {
        doc.renewal_tokens
            .values()
            .find(|t| constant_time_str_eq(&t.token, token) && t.is_active_at(now))
            .cloned()
    }
}
