//! Session Lifecycle Tests
//!
//! End-to-end behavior of the service facade:
//! - register, login, renew, revoke
//! - one renewal token per account, reused while active
//! - expired renewal tokens behave like absent ones
//! - email uniqueness and post validation

use std::sync::Arc;
use std::thread;

use chirpstore::api::{ApiError, ChirpService};
use chirpstore::auth::{AuthError, AuthResult};
use chirpstore::config::Config;
use chirpstore::repository::RepositoryError;
use chirpstore::store::Store;
use chrono::{Duration, Utc};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_test_service() -> (TempDir, ChirpService) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::new(temp_dir.path().join("database.json"), "integration-secret");
    let service = ChirpService::open(&config).unwrap();
    (temp_dir, service)
}

/// Push every stored renewal token into the past
fn expire_renewal_tokens(service: &ChirpService) {
    let store = Store::open(service.store_path()).unwrap();
    store
        .transact(|doc| -> AuthResult<()> {
            for token in doc.renewal_tokens.values_mut() {
                token.expires_at = Utc::now() - Duration::seconds(1);
            }
            Ok(())
        })
        .unwrap();
}

// =============================================================================
// Renewal token lifecycle
// =============================================================================

#[test]
fn test_register_login_renew_revoke() {
    let (_tmp, service) = create_test_service();

    let account = service.register("a@x.com", "pw1").unwrap();
    assert_eq!(account.id, 1);

    let login = service.login("a@x.com", "pw1", None).unwrap();
    assert_eq!(service.authenticate(&login.token).unwrap(), 1);

    let renewed = service.refresh(&login.refresh_token).unwrap();
    assert_eq!(service.authenticate(&renewed.token).unwrap(), 1);

    service.revoke(&login.refresh_token).unwrap();
    let err = service.refresh(&login.refresh_token).unwrap_err();
    assert!(matches!(err, ApiError::Auth(AuthError::InvalidToken)));
    assert_eq!(err.status_code(), 401);
}

#[test]
fn test_renewal_token_reused_until_expiry() {
    let (_tmp, service) = create_test_service();
    service.register("a@x.com", "pw1").unwrap();

    let first = service.login("a@x.com", "pw1", None).unwrap();
    let second = service.login("a@x.com", "pw1", None).unwrap();
    assert_eq!(first.refresh_token, second.refresh_token);

    expire_renewal_tokens(&service);
    assert!(service.refresh(&first.refresh_token).is_err());

    let third = service.login("a@x.com", "pw1", None).unwrap();
    assert_ne!(third.refresh_token, first.refresh_token);
    assert!(service.refresh(&third.refresh_token).is_ok());
}

#[test]
fn test_exchange_can_repeat() {
    let (_tmp, service) = create_test_service();
    service.register("a@x.com", "pw1").unwrap();
    let login = service.login("a@x.com", "pw1", None).unwrap();

    for _ in 0..3 {
        service.refresh(&login.refresh_token).unwrap();
    }
    assert_eq!(service.metrics().sessions_renewed, 3);
}

#[test]
fn test_purge_removes_only_expired() {
    let (_tmp, service) = create_test_service();
    service.register("a@x.com", "pw1").unwrap();
    service.register("b@x.com", "pw2").unwrap();

    service.login("a@x.com", "pw1", None).unwrap();
    expire_renewal_tokens(&service);
    let live = service.login("b@x.com", "pw2", None).unwrap();

    assert_eq!(service.purge_expired_tokens().unwrap(), 1);
    assert!(service.refresh(&live.refresh_token).is_ok());
}

#[test]
fn test_credential_change_revokes_renewal_token() {
    let (_tmp, service) = create_test_service();
    service.register("a@x.com", "pw1").unwrap();
    let login = service.login("a@x.com", "pw1", None).unwrap();

    service
        .update_account(&login.token, "a@x.com", "pw2")
        .unwrap();

    assert!(service.refresh(&login.refresh_token).is_err());
}

// =============================================================================
// Session tokens
// =============================================================================

#[test]
fn test_requested_ttl_is_capped_at_default() {
    let (_tmp, service) = create_test_service();
    service.register("a@x.com", "pw1").unwrap();

    let login = service
        .login("a@x.com", "pw1", Some(30 * 24 * 60 * 60))
        .unwrap();
    let claims = service.jwt().decode_claims(&login.token).unwrap();
    assert_eq!(claims.exp - claims.iat, 3600);
    assert_eq!(claims.iss, "chirpy");
}

#[test]
fn test_token_from_other_secret_rejected() {
    let (_tmp, service) = create_test_service();
    service.register("a@x.com", "pw1").unwrap();
    let login = service.login("a@x.com", "pw1", None).unwrap();

    let other_dir = TempDir::new().unwrap();
    let other = ChirpService::open(&Config::new(
        other_dir.path().join("database.json"),
        "another-secret",
    ))
    .unwrap();

    assert!(other.authenticate(&login.token).is_err());
}

// =============================================================================
// Accounts and posts
// =============================================================================

#[test]
fn test_email_uniqueness_under_contention() {
    let (_tmp, service) = create_test_service();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = service.clone();
            thread::spawn(move || service.register("same@x.com", &format!("pw{}", i)))
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one registration may win");

    for err in outcomes.into_iter().filter_map(Result::err) {
        assert_eq!(err.code(), "DUPLICATE_EMAIL");
        assert_eq!(err.status_code(), 409);
    }
}

#[test]
fn test_post_length_boundary() {
    let (_tmp, service) = create_test_service();

    let err = service.create_post(&"a".repeat(140), None).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Repository(RepositoryError::Validation(_))
    ));
    assert!(service.list_posts().unwrap().is_empty());

    let post = service.create_post(&"a".repeat(139), None).unwrap();
    assert_eq!(post.id, 1);
}

#[test]
fn test_post_length_counts_unfiltered_body() {
    let (_tmp, service) = create_test_service();

    // Filtering would bring this under the limit
    let body = format!("{} sharbert", "a".repeat(131));
    assert_eq!(body.chars().count(), 140);

    let err = service.create_post(&body, None).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(service.list_posts().unwrap().is_empty());
}

#[test]
fn test_posts_by_author() {
    let (_tmp, service) = create_test_service();
    let author = service.register("a@x.com", "pw1").unwrap();

    service.create_post("mine", Some(author.id)).unwrap();
    service.create_post("nobody's", None).unwrap();

    let mine = service.list_posts_by_author(author.id).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].body, "mine");
    assert_eq!(service.list_posts().unwrap().len(), 2);
}

#[test]
fn test_concurrent_posts_through_service() {
    let (_tmp, service) = create_test_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for i in 0..5 {
                    service
                        .create_post(&format!("t{} p{}", t, i), None)
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut ids: Vec<_> = service.list_posts().unwrap().iter().map(|p| p.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
}
