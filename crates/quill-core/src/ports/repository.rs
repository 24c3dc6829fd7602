use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ContentPost, PostStatus};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update, keyed by id).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Content store for posts.
///
/// Listings are ordered newest first: by `published_at` descending with
/// drafts last, then by `created_at` descending.
#[async_trait]
pub trait PostRepository: BaseRepository<ContentPost, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ContentPost>, RepoError>;

    /// List posts whose status derived at `now` equals `status`, or every
    /// post when `status` is `None`.
    async fn list_by_status(
        &self,
        status: Option<PostStatus>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContentPost>, RepoError>;

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<ContentPost>, RepoError>;

    /// The public listing: published posts only.
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<ContentPost>, RepoError> {
        self.list_by_status(Some(PostStatus::Published), now).await
    }
}

/// Sort key shared by the in-process listings.
pub fn listing_order(a: &ContentPost, b: &ContentPost) -> std::cmp::Ordering {
    b.published_at
        .cmp(&a.published_at)
        .then_with(|| b.created_at.cmp(&a.created_at))
}
