//! The persisted document and the records it holds
//!
//! One document per deployment. Collections are ordered maps keyed by
//! identifier so the serialized form is deterministic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier type shared by every collection
pub type EntityId = u64;

/// A short text post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<EntityId>,
}

/// A registered account
///
/// `password_hash` is an Argon2id PHC string. It is persisted but never
/// exposed through the public views in `api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: EntityId,
    pub email: String,
    pub password_hash: String,
}

/// Long-lived opaque token used to mint new session tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalToken {
    pub owner_id: EntityId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RenewalToken {
    /// Whether the token is still usable at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Highest identifier ever assigned per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequences {
    #[serde(default)]
    pub posts: EntityId,
    #[serde(default)]
    pub accounts: EntityId,
}

/// The whole persisted aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub posts: BTreeMap<EntityId, Post>,
    #[serde(default)]
    pub accounts: BTreeMap<EntityId, Account>,
    #[serde(default)]
    pub renewal_tokens: BTreeMap<EntityId, RenewalToken>,
    #[serde(default)]
    pub sequences: Sequences,
}

impl Document {
    /// An empty document with three empty collections
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serialize to the on-disk JSON form
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    /// Parse the on-disk JSON form
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
