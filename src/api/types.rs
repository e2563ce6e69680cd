//! Boundary response shapes
//!
//! These are `Serialize` so any transport can encode them; none of them
//! carries a password hash.

use serde::{Deserialize, Serialize};

use crate::store::{Account, EntityId};

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: EntityId,
    pub email: String,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: EntityId,
    pub email: String,
    /// Session token
    pub token: String,
    /// Renewal token
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}
