//! Entity repositories over the document store
//!
//! [`Entity`] ties a record type to its collection and identifier
//! sequence; [`Repository`] provides create/get/list/find for any entity.
//! The `*_in` helpers operate on a document already inside a transaction,
//! so services can compose several mutations into one critical section.

mod accounts;
mod errors;
mod posts;

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::store::{Account, Document, EntityId, Post, Store};

pub use accounts::AccountRepository;
pub use errors::{RepositoryError, RepositoryResult};
pub use posts::{validate_body, PostRepository, MAX_POST_LENGTH};

/// A record stored in one of the document's collections
pub trait Entity: Clone {
    /// Singular name used in error messages
    const NAME: &'static str;

    fn collection(doc: &Document) -> &BTreeMap<EntityId, Self>;

    fn collection_mut(doc: &mut Document) -> &mut BTreeMap<EntityId, Self>;

    /// Highest identifier ever handed out for this collection
    fn sequence_mut(doc: &mut Document) -> &mut EntityId;

    /// Allocate the next identifier.
    ///
    /// One past the larger of the persisted sequence and the largest key
    /// present, so identifiers are never reused.
    fn allocate_id(doc: &mut Document) -> EntityId {
        let max_key = Self::collection(doc).keys().next_back().copied().unwrap_or(0);
        let seq = Self::sequence_mut(doc);
        let next = (*seq).max(max_key) + 1;
        *seq = next;
        next
    }

    /// Insert a new record built from its freshly allocated id
    fn insert_in(doc: &mut Document, build: impl FnOnce(EntityId) -> Self) -> Self {
        let id = Self::allocate_id(doc);
        let entity = build(id);
        Self::collection_mut(doc).insert(id, entity.clone());
        entity
    }

    fn get_in(doc: &Document, id: EntityId) -> RepositoryResult<Self> {
        Self::collection(doc)
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound {
                collection: Self::NAME,
                id,
            })
    }
}

impl Entity for Post {
    const NAME: &'static str = "post";

    fn collection(doc: &Document) -> &BTreeMap<EntityId, Self> {
        &doc.posts
    }

    fn collection_mut(doc: &mut Document) -> &mut BTreeMap<EntityId, Self> {
        &mut doc.posts
    }

    fn sequence_mut(doc: &mut Document) -> &mut EntityId {
        &mut doc.sequences.posts
    }
}

impl Entity for Account {
    const NAME: &'static str = "account";

    fn collection(doc: &Document) -> &BTreeMap<EntityId, Self> {
        &doc.accounts
    }

    fn collection_mut(doc: &mut Document) -> &mut BTreeMap<EntityId, Self> {
        &mut doc.accounts
    }

    fn sequence_mut(doc: &mut Document) -> &mut EntityId {
        &mut doc.sequences.accounts
    }
}

/// Generic create/read/list over one collection
#[derive(Debug)]
pub struct Repository<E: Entity> {
    store: Arc<Store>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Allocate an id, build the record and persist it
    pub fn create(&self, build: impl FnOnce(EntityId) -> E) -> RepositoryResult<E> {
        self.store.transact(|doc| Ok(E::insert_in(doc, build)))
    }

    pub fn get(&self, id: EntityId) -> RepositoryResult<E> {
        self.store.read(|doc| E::get_in(doc, id))
    }

    /// Every record in the collection, in unspecified order
    pub fn list(&self) -> RepositoryResult<Vec<E>> {
        self.store
            .read(|doc| Ok(E::collection(doc).values().cloned().collect()))
    }

    /// First record matching `predicate` (linear scan)
    pub fn find_by(&self, predicate: impl Fn(&E) -> bool) -> RepositoryResult<Option<E>> {
        self.store
            .read(|doc| Ok(E::collection(doc).values().find(|e| predicate(*e)).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;
    use tempfile::TempDir;

    fn post_repo(tmp: &TempDir) -> Repository<Post> {
        let store = Store::open(tmp.path().join("database.json")).unwrap();
        Repository::new(Arc::new(store))
    }

    fn plain_post(id: EntityId) -> Post {
        Post {
            id,
            body: format!("post {}", id),
            author_id: None,
        }
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let tmp = TempDir::new().unwrap();
        let repo = post_repo(&tmp);

        assert_eq!(repo.create(plain_post).unwrap().id, 1);
        assert_eq!(repo.create(plain_post).unwrap().id, 2);
        assert_eq!(repo.create(plain_post).unwrap().id, 3);
    }

    #[test]
    fn test_allocation_ignores_collection_size() {
        let mut doc = Document::empty();
        doc.posts.insert(5, plain_post(5));

        // One past the max key, not len() + 1
        assert_eq!(Post::allocate_id(&mut doc), 6);
        assert_eq!(doc.sequences.posts, 6);

        // Removing records never causes reuse
        doc.posts.clear();
        assert_eq!(Post::allocate_id(&mut doc), 7);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let repo = post_repo(&tmp);

        let err = repo.get(42).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::NotFound {
                collection: "post",
                id: 42
            }
        ));
    }

    #[test]
    fn test_list_and_find() {
        let tmp = TempDir::new().unwrap();
        let repo = post_repo(&tmp);
        for _ in 0..3 {
            repo.create(plain_post).unwrap();
        }

        let mut ids: Vec<_> = repo.list().unwrap().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);

        let found = repo.find_by(|p| p.body == "post 2").unwrap().unwrap();
        assert_eq!(found.id, 2);
        assert!(repo.find_by(|p| p.body == "nope").unwrap().is_none());
    }

    #[test]
    fn test_concurrent_creates_get_distinct_gapless_ids() {
        let tmp = TempDir::new().unwrap();
        let repo = post_repo(&tmp);
        let threads = 8;
        let per_thread = 6;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let repo = repo.clone();
                thread::spawn(move || {
                    (0..per_thread)
                        .map(|_| repo.create(plain_post).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: HashSet<EntityId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let n = (threads * per_thread) as EntityId;
        assert_eq!(ids.len() as EntityId, n);
        assert_eq!(ids, (1..=n).collect::<HashSet<_>>());
        assert_eq!(repo.list().unwrap().len() as EntityId, n);
    }
}
