//! Post repository

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};
use crate::store::{EntityId, Post, Store};

use super::errors::{RepositoryError, RepositoryResult};
use super::{Entity, Repository};

/// Bodies must be strictly shorter than this many characters
pub const MAX_POST_LENGTH: usize = 140;

/// Validate a post body against the length limit
pub fn validate_body(body: &str) -> RepositoryResult<()> {
    let len = body.chars().count();
    if len >= MAX_POST_LENGTH {
        return Err(RepositoryError::Validation(format!(
            "Post body must be shorter than {} characters (got {})",
            MAX_POST_LENGTH, len
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PostRepository {
    inner: Repository<Post>,
}

impl PostRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    /// Create a post.
    ///
    /// The author, when given, must reference an existing account. The
    /// check and the insert happen in the same transaction.
    pub fn create(&self, body: &str, author_id: Option<EntityId>) -> RepositoryResult<Post> {
        validate_body(body)?;

        let post = self.inner.store().transact(|doc| {
            if let Some(author) = author_id {
                if !doc.accounts.contains_key(&author) {
                    return Err(RepositoryError::Validation(format!(
                        "Unknown author {}",
                        author
                    )));
                }
            }
            Ok(Post::insert_in(doc, |id| Post {
                id,
                body: body.to_string(),
                author_id,
            }))
        })?;

        let id = post.id.to_string();
        log_event_with_fields(Event::PostCreated, &[("post_id", id.as_str())]);
        Ok(post)
    }

    pub fn get(&self, id: EntityId) -> RepositoryResult<Post> {
        self.inner.get(id)
    }

    pub fn list(&self) -> RepositoryResult<Vec<Post>> {
        self.inner.list()
    }

    /// Posts written by `author_id`
    pub fn list_by_author(&self, author_id: EntityId) -> RepositoryResult<Vec<Post>> {
        let mut posts = self.inner.list()?;
        posts.retain(|p| p.author_id == Some(author_id));
        Ok(posts)
    }
}
