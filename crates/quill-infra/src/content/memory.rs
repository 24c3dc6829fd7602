//! In-memory content store - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{ContentPost, PostStatus};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, listing_order};

/// Posts kept in a map behind an async RwLock.
///
/// Status is derived on every read, so nothing here ever changes when a
/// scheduled post goes live.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, ContentPost>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<ContentPost, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContentPost>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, post: ContentPost) -> Result<ContentPost, RepoError> {
        let mut posts = self.posts.write().await;

        if posts
            .values()
            .any(|existing| existing.slug == post.slug && existing.id != post.id)
        {
            return Err(RepoError::Constraint(format!(
                "slug `{}` already in use",
                post.slug
            )));
        }

        posts.insert(post.id, post.clone());
        tracing::debug!(post_id = %post.id, slug = %post.slug, "Post saved");
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.posts.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ContentPost>, RepoError> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn list_by_status(
        &self,
        status: Option<PostStatus>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContentPost>, RepoError> {
        let mut posts: Vec<ContentPost> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| status.is_none_or(|s| p.status(now) == s))
            .cloned()
            .collect();
        posts.sort_by(listing_order);
        Ok(posts)
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<ContentPost>, RepoError> {
        let mut posts: Vec<ContentPost> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.has_tag(tag))
            .cloned()
            .collect();
        posts.sort_by(listing_order);
        Ok(posts)
    }
}
