//! Operational counters
//!
//! - Counters only
//! - Monotonic, except the hit counter which can be reset explicitly
//! - Atomic, Relaxed ordering

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Front-end visits
    hits: AtomicU64,
    posts_created: AtomicU64,
    accounts_registered: AtomicU64,
    logins_succeeded: AtomicU64,
    logins_failed: AtomicU64,
    sessions_renewed: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_hits(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset_hits(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }

    pub fn increment_posts_created(&self) {
        self.posts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_accounts_registered(&self) {
        self.accounts_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_logins_succeeded(&self) {
        self.logins_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_logins_failed(&self) {
        self.logins_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sessions_renewed(&self) {
        self.sessions_renewed.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            posts_created: self.posts_created.load(Ordering::Relaxed),
            accounts_registered: self.accounts_registered.load(Ordering::Relaxed),
            logins_succeeded: self.logins_succeeded.load(Ordering::Relaxed),
            logins_failed: self.logins_failed.load(Ordering::Relaxed),
            sessions_renewed: self.sessions_renewed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub posts_created: u64,
    pub accounts_registered: u64,
    pub logins_succeeded: u64,
    pub logins_failed: u64,
    pub sessions_renewed: u64,
}
