//! # Credentials
//!
//! Registration, password verification and credential updates for
//! accounts. Hashing runs before the transaction guard is taken so the
//! expensive part never blocks other writers.

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};
use crate::repository::AccountRepository;
use crate::store::{Account, Document, EntityId, Store};

use super::crypto::{hash_password, verify_password, PasswordPolicy};
use super::errors::{AuthError, AuthResult};
use super::renewal::RenewalTokenManager;

#[derive(Debug, Clone)]
pub struct CredentialService {
    accounts: AccountRepository,
    policy: PasswordPolicy,
}

impl CredentialService {
    pub fn new(store: Arc<Store>, policy: PasswordPolicy) -> Self {
        Self {
            accounts: AccountRepository::new(store),
            policy,
        }
    }

    pub fn accounts(&self) -> &AccountRepository {
        &self.accounts
    }

    /// Register a new account
    pub fn register(&self, email: &str, password: &str) -> AuthResult<Account> {
        self.policy.validate(password)?;

        // Skips the Argon2 hash for a taken email; insert_unique re-checks
        // under the guard
        if self.accounts.find_by_email(email)?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let hash = hash_password(password)?;
        let account = self.accounts.insert_unique(email, hash)?;

        let id = account.id.to_string();
        log_event_with_fields(Event::AccountRegistered, &[("account_id", id.as_str())]);
        Ok(account)
    }

    /// Check an email/password pair
    pub fn verify(&self, email: &str, password: &str) -> AuthResult<Account> {
        let account = self
            .accounts
            .find_by_email(email)?
            .ok_or(AuthError::AccountNotFound)?;

        if !verify_password(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Overwrite an account's email and password.
    ///
    /// Any renewal token the account holds is revoked in the same
    /// transaction, so old devices must log in again.
    pub fn update_credentials(
        &self,
        account_id: EntityId,
        new_email: &str,
        new_password: &str,
    ) -> AuthResult<Account> {
        self.policy.validate(new_password)?;
        let hash = hash_password(new_password)?;

        let account = self
            .accounts
            .store()
            .transact(|doc| Self::update_in(doc, account_id, new_email, hash))?;

        let id = account.id.to_string();
        log_event_with_fields(Event::CredentialsUpdated, &[("account_id", id.as_str())]);
        Ok(account)
    }

    fn update_in(
        doc: &mut Document,
        account_id: EntityId,
        new_email: &str,
        hash: String,
    ) -> AuthResult<Account> {
        let account = AccountRepository::update_in(doc, account_id, new_email, hash)?;
        RenewalTokenManager::revoke_all_in(doc, account_id);
        Ok(account)
    }

    pub fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        Ok(self.accounts.find_by_email(email)?)
    }
}
