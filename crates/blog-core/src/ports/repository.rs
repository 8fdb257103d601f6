use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostChanges};
use crate::error::RepoError;

/// Generic repository trait defining the single-entity operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID. `None` when nothing matches.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity and return it as stored.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Deleting a missing entity is not an error.
    async fn delete_by_id(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository - the only gateway to the post store.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts in the store's natural order.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Build a post from the supplied fields and persist it.
    ///
    /// Missing required fields fail with [`RepoError::Validation`] before the
    /// store is touched.
    async fn insert(&self, fields: NewPost) -> Result<Post, RepoError>;

    /// Apply `changes` to the post matching `id`.
    ///
    /// Returns the post as stored after the update, or `None` when no post
    /// matches. An empty change set leaves the post untouched.
    async fn update_by_id(&self, id: Uuid, changes: PostChanges)
    -> Result<Option<Post>, RepoError>;
}
