//! Account repository
//!
//! Email is the unique field. Uniqueness checks always run inside the
//! same transaction as the write they guard.

use std::sync::Arc;

use crate::store::{Account, Document, EntityId, Store};

use super::errors::{RepositoryError, RepositoryResult};
use super::{Entity, Repository};

#[derive(Debug, Clone)]
pub struct AccountRepository {
    inner: Repository<Account>,
}

impl AccountRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        self.inner.store()
    }

    /// Insert a new account unless the email is taken
    pub fn insert_unique(&self, email: &str, password_hash: String) -> RepositoryResult<Account> {
        self.inner
            .store()
            .transact(|doc| Self::insert_unique_in(doc, email, password_hash))
    }

    pub fn insert_unique_in(
        doc: &mut Document,
        email: &str,
        password_hash: String,
    ) -> RepositoryResult<Account> {
        if Self::find_by_email_in(doc, email).is_some() {
            return Err(RepositoryError::DuplicateEmail);
        }
        Ok(Account::insert_in(doc, |id| Account {
            id,
            email: email.to_string(),
            password_hash,
        }))
    }

    /// Overwrite email and password hash of an existing account
    pub fn update_in(
        doc: &mut Document,
        id: EntityId,
        email: &str,
        password_hash: String,
    ) -> RepositoryResult<Account> {
        if let Some(other) = Self::find_by_email_in(doc, email) {
            if other.id != id {
                return Err(RepositoryError::DuplicateEmail);
            }
        }
        let account = doc
            .accounts
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound {
                collection: Account::NAME,
                id,
            })?;
        account.email = email.to_string();
        account.password_hash = password_hash;
        Ok(account.clone())
    }

    pub fn get(&self, id: EntityId) -> RepositoryResult<Account> {
        self.inner.get(id)
    }

    pub fn list(&self) -> RepositoryResult<Vec<Account>> {
        self.inner.list()
    }

    /// Case-sensitive exact match
    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Account>> {
        self.inner.find_by(|a| a.email == email)
    }

    pub fn find_by_email_in(doc: &Document, email: &str) -> Option<Account> {
        doc.accounts.values().find(|a| a.email == email).cloned()
    }
}
