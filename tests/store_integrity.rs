//! Store Integrity Tests
//!
//! Tests for the document file and transaction guard:
//! - Concurrent writers never lose an update
//! - Identifiers are distinct and gapless under contention
//! - Replacing with a freshly loaded document is a no-op
//! - Data survives reopening the store

use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;
use std::thread;

use chirpstore::repository::{Entity, Repository, RepositoryResult};
use chirpstore::store::{Account, DocumentFile, Post, Store, StoreErrorCode};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_store() -> (TempDir, Arc<Store>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(Store::open(temp_dir.path().join("database.json")).unwrap());
    (temp_dir, store)
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_post_creates_get_distinct_gapless_ids() {
    let (_tmp, store) = create_temp_store();
    let threads = 8;
    let per_thread = 10;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let repo = Repository::<Post>::new(Arc::clone(&store));
            thread::spawn(move || {
                (0..per_thread)
                    .map(|i| {
                        repo.create(|id| Post {
                            id,
                            body: format!("thread {} post {}", t, i),
                            author_id: None,
                        })
                        .unwrap()
                        .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: BTreeSet<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let total = (threads * per_thread) as u64;
    assert_eq!(ids.len() as u64, total, "every create must get its own id");
    assert_eq!(ids, (1..=total).collect::<BTreeSet<_>>());

    let doc = store.snapshot().unwrap();
    assert_eq!(doc.posts.len() as u64, total, "no create may be lost");
    assert_eq!(doc.sequences.posts, total);
}

#[test]
fn test_mixed_collections_under_contention() {
    let (_tmp, store) = create_temp_store();

    let posts = {
        let repo = Repository::<Post>::new(Arc::clone(&store));
        thread::spawn(move || {
            for i in 0..20 {
                repo.create(|id| Post {
                    id,
                    body: format!("post {}", i),
                    author_id: None,
                })
                .unwrap();
            }
        })
    };
    let accounts = {
        let repo = Repository::<Account>::new(Arc::clone(&store));
        thread::spawn(move || {
            for i in 0..20 {
                repo.create(|id| Account {
                    id,
                    email: format!("user{}@x.com", i),
                    password_hash: "h".to_string(),
                })
                .unwrap();
            }
        })
    };
    posts.join().unwrap();
    accounts.join().unwrap();

    let doc = store.snapshot().unwrap();
    assert_eq!(doc.posts.len(), 20);
    assert_eq!(doc.accounts.len(), 20);
}

// =============================================================================
// Round trip and persistence
// =============================================================================

#[test]
fn test_replace_with_loaded_document_is_noop() {
    let (tmp, store) = create_temp_store();
    store
        .transact(|doc| -> RepositoryResult<()> {
            Post::insert_in(doc, |id| Post {
                id,
                body: "first".to_string(),
                author_id: None,
            });
            Ok(())
        })
        .unwrap();

    let file = DocumentFile::new(tmp.path().join("database.json"));
    let before = fs::read(file.path()).unwrap();
    file.replace(&file.load().unwrap()).unwrap();
    let after = fs::read(file.path()).unwrap();

    assert_eq!(before, after);
}

#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("database.json");

    {
        let store = Arc::new(Store::open(&path).unwrap());
        let repo = Repository::<Post>::new(store);
        repo.create(|id| Post {
            id,
            body: "persisted".to_string(),
            author_id: None,
        })
        .unwrap();
    }

    let store = Arc::new(Store::open(&path).unwrap());
    let repo = Repository::<Post>::new(Arc::clone(&store));
    assert_eq!(repo.get(1).unwrap().body, "persisted");

    // The sequence carries over, so ids continue rather than restart
    let next = repo
        .create(|id| Post {
            id,
            body: "second".to_string(),
            author_id: None,
        })
        .unwrap();
    assert_eq!(next.id, 2);
}

#[test]
fn test_failed_transaction_leaves_document_unchanged() {
    let (_tmp, store) = create_temp_store();
    let before = fs::read(store.path()).unwrap();

    let result = store.transact(|doc| -> RepositoryResult<()> {
        Post::insert_in(doc, |id| Post {
            id,
            body: "discarded".to_string(),
            author_id: None,
        });
        Err(chirpstore::repository::RepositoryError::Validation(
            "abort".to_string(),
        ))
    });

    assert!(result.is_err());
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

#[test]
fn test_corrupt_document_is_reported_not_repaired() {
    let (_tmp, store) = create_temp_store();
    fs::write(store.path(), b"[1, 2").unwrap();

    let err = store.snapshot().unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::Decode);
    assert_eq!(fs::read(store.path()).unwrap(), b"[1, 2");
}
