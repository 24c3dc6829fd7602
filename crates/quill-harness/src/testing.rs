//! Test doubles shared by the harness tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use quill_core::domain::{ContentPost, PostStatus};
use quill_core::ports::{BaseRepository, Clock, PostRepository};
use quill_core::RepoError;
use quill_infra::InMemoryPostRepository;

/// Wall clock that follows tokio's (possibly paused) time.
pub struct TokioClock {
    base: DateTime<Utc>,
    started: tokio::time::Instant,
}

impl TokioClock {
    pub fn new(base: DateTime<Utc>) -> Self {
        Self {
            base,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.started.elapsed()).unwrap_or(chrono::Duration::zero());
        self.base + elapsed
    }
}

/// In-memory store with scripted failures.
#[derive(Default)]
pub struct FailingRepository {
    inner: InMemoryPostRepository,
    fail_save_on: Option<usize>,
    failing_listings: usize,
    save_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl FailingRepository {
    /// The `n`th save (1-based) fails with a connection error.
    pub fn failing_on_save(n: usize) -> Self {
        Self {
            fail_save_on: Some(n),
            ..Default::default()
        }
    }

    /// The first `n` listings fail.
    pub fn failing_listings(n: usize) -> Self {
        Self {
            failing_listings: n,
            ..Default::default()
        }
    }

    /// Every listing fails.
    pub fn unreachable() -> Self {
        Self::failing_listings(usize::MAX)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseRepository<ContentPost, Uuid> for FailingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContentPost>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, post: ContentPost) -> Result<ContentPost, RepoError> {
        let call = self.save_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_save_on == Some(call) {
            return Err(RepoError::Connection("connection reset".to_string()));
        }
        self.inner.save(post).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl PostRepository for FailingRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ContentPost>, RepoError> {
        self.inner.find_by_slug(slug).await
    }

    async fn list_by_status(
        &self,
        status: Option<PostStatus>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContentPost>, RepoError> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failing_listings {
            return Err(RepoError::Connection("listing unavailable".to_string()));
        }
        self.inner.list_by_status(status, now).await
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<ContentPost>, RepoError> {
        self.inner.find_by_tag(tag).await
    }
}
