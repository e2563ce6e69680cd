//! Service facade used by transports
//!
//! [`AppContext`] owns everything a request handler needs: the store,
//! the token machinery and the counters. It is built once and shared;
//! handlers receive a [`ChirpService`] (a cheap `Arc` clone) instead of
//! reaching for globals.

use std::path::Path;
use std::sync::Arc;

use crate::auth::{
    AuthError, CredentialService, JwtConfig, JwtManager, PasswordPolicy, RenewalConfig,
    RenewalTokenManager,
};
use crate::censor::clean_body;
use crate::config::Config;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, MetricsSnapshot};
use crate::repository::{validate_body, PostRepository, RepositoryError};
use crate::store::{EntityId, Post, Store};

use super::errors::{ApiError, ApiResult};
use super::types::{AccountView, LoginResponse, RefreshResponse};

/// Shared state behind every [`ChirpService`] handle
#[derive(Debug)]
pub struct AppContext {
    store: Arc<Store>,
    posts: PostRepository,
    credentials: CredentialService,
    renewal: RenewalTokenManager,
    jwt: JwtManager,
    metrics: MetricsRegistry,
}

impl AppContext {
    pub fn new(
        store: Arc<Store>,
        jwt_config: JwtConfig,
        renewal_config: RenewalConfig,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            posts: PostRepository::new(Arc::clone(&store)),
            credentials: CredentialService::new(Arc::clone(&store), policy),
            renewal: RenewalTokenManager::new(renewal_config, Arc::clone(&store)),
            jwt: JwtManager::new(jwt_config),
            metrics: MetricsRegistry::new(),
            store,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChirpService {
    ctx: Arc<AppContext>,
}

impl ChirpService {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Open the store named by `config` and wire every component
    pub fn open(config: &Config) -> ApiResult<Self> {
        let store = Arc::new(Store::open(&config.db_path)?);
        Ok(Self::new(AppContext::new(
            store,
            config.jwt_config(),
            config.renewal_config(),
            config.password_policy(),
        )))
    }

    pub fn store_path(&self) -> &Path {
        self.ctx.store.path()
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.ctx.jwt
    }

    // ==================
    // Posts
    // ==================

    /// Validate, filter and persist a post.
    ///
    /// The length limit applies to the body as submitted, before the
    /// profanity filter shortens it.
    pub fn create_post(&self, body: &str, author_id: Option<EntityId>) -> ApiResult<Post> {
        let created = validate_body(body)
            .and_then(|_| self.ctx.posts.create(&clean_body(body), author_id));
        match created {
            Ok(post) => {
                self.ctx.metrics.increment_posts_created();
                Ok(post)
            }
            Err(e) => {
                if let RepositoryError::Validation(ref reason) = e {
                    log_event_with_fields(Event::PostRejected, &[("reason", reason.as_str())]);
                }
                Err(e.into())
            }
        }
    }

    pub fn get_post(&self, id: EntityId) -> ApiResult<Post> {
        Ok(self.ctx.posts.get(id)?)
    }

    pub fn list_posts(&self) -> ApiResult<Vec<Post>> {
        Ok(self.ctx.posts.list()?)
    }

    pub fn list_posts_by_author(&self, author_id: EntityId) -> ApiResult<Vec<Post>> {
        Ok(self.ctx.posts.list_by_author(author_id)?)
    }

    // ==================
    // Accounts & sessions
    // ==================

    pub fn register(&self, email: &str, password: &str) -> ApiResult<AccountView> {
        let account = self.ctx.credentials.register(email, password)?;
        self.ctx.metrics.increment_accounts_registered();
        Ok(account.into())
    }

    /// Authenticate and hand out a session token plus renewal token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller. `requested_ttl_secs` is capped at the default lifetime.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl_secs: Option<i64>,
    ) -> ApiResult<LoginResponse> {
        let account = match self.ctx.credentials.verify(email, password) {
            Ok(account) => account,
            Err(AuthError::AccountNotFound) | Err(AuthError::InvalidCredentials) => {
                self.ctx.metrics.increment_logins_failed();
                log_event_with_fields(Event::LoginFailed, &[]);
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e.into()),
        };

        let requested_ttl = requested_ttl_secs.map(|secs| self.ctx.jwt.ttl_from_secs(secs));
        let token = self.ctx.jwt.issue(account.id, requested_ttl)?;
        let renewal = self.ctx.renewal.get_or_issue(account.id)?;

        self.ctx.metrics.increment_logins_succeeded();
        let id = account.id.to_string();
        log_event_with_fields(Event::LoginSucceeded, &[("account_id", id.as_str())]);

        Ok(LoginResponse {
            id: account.id,
            email: account.email,
            token,
            refresh_token: renewal.token,
        })
    }

    /// Mint a new session token from a renewal token
    pub fn refresh(&self, renewal_token: &str) -> ApiResult<RefreshResponse> {
        match self.ctx.renewal.exchange(renewal_token, &self.ctx.jwt) {
            Ok(token) => {
                self.ctx.metrics.increment_sessions_renewed();
                Ok(RefreshResponse { token })
            }
            Err(e) => {
                if e.is_client_error() {
                    log_event_with_fields(Event::SessionRenewRejected, &[]);
                }
                Err(e.into())
            }
        }
    }

    /// Revoke a renewal token. Unknown tokens are accepted silently.
    pub fn revoke(&self, renewal_token: &str) -> ApiResult<()> {
        Ok(self.ctx.renewal.revoke(renewal_token)?)
    }

    /// Account id of a verified session token.
    ///
    /// Accepts either the bare token or an `Authorization` header value
    /// with a `Bearer ` prefix.
    pub fn authenticate(&self, authorization: &str) -> ApiResult<EntityId> {
        let token = authorization
            .strip_prefix("Bearer ")
            .unwrap_or(authorization)
            .trim();
        Ok(self.ctx.jwt.verify(token)?)
    }

    /// Change the email and password of the session's account
    pub fn update_account(
        &self,
        session_token: &str,
        new_email: &str,
        new_password: &str,
    ) -> ApiResult<AccountView> {
        let account_id = self.authenticate(session_token)?;
        let account = self
            .ctx
            .credentials
            .update_credentials(account_id, new_email, new_password)?;
        Ok(account.into())
    }

    // ==================
    // Maintenance
    // ==================

    pub fn purge_expired_tokens(&self) -> ApiResult<usize> {
        let removed = self.ctx.renewal.purge_expired()?;
        let count = removed.to_string();
        log_event_with_fields(Event::RenewalTokensPurged, &[("count", count.as_str())]);
        Ok(removed)
    }

    /// Succeeds when the document can be loaded
    pub fn health(&self) -> ApiResult<()> {
        self.ctx.store.snapshot().map(|_| ()).map_err(|e| {
            log_event_with_fields(Event::StoreFailed, &[("error", e.to_string().as_str())]);
            ApiError::from(e)
        })
    }

    pub fn record_hit(&self) -> u64 {
        self.ctx.metrics.increment_hits()
    }

    pub fn hits(&self) -> u64 {
        self.ctx.metrics.hits()
    }

    pub fn reset_hits(&self) {
        self.ctx.metrics.reset_hits();
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.ctx.metrics.snapshot()
    }
}
