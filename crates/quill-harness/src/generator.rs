//! Synthetic post generation.
//!
//! Posts are created one at a time. The first failing call stops the batch,
//! and the outcome keeps everything created before it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use quill_core::domain::{ContentPost, PostStatus, TEST_DATA_TAG};
use quill_core::ports::{BaseRepository, Clock, PostRepository};
use quill_core::{DomainError, RepoError};

use crate::error::HarnessError;

/// Offset applied to posts meant to be live at creation time.
const PUBLISHED_OFFSET_MINUTES: i64 = 1;

/// Upper bound on the number of posts one plan may create.
pub const MAX_BATCH: usize = 200;

/// One post to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSpec {
    Published,
    Draft,
    /// Goes live this far after the batch starts.
    ScheduledIn(Duration),
    ScheduledAt(DateTime<Utc>),
}

impl PostSpec {
    pub fn intended_status(&self) -> PostStatus {
        match self {
            PostSpec::Published => PostStatus::Published,
            PostSpec::Draft => PostStatus::Draft,
            PostSpec::ScheduledIn(_) | PostSpec::ScheduledAt(_) => PostStatus::Scheduled,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PostSpec::Published => "Published",
            PostSpec::Draft => "Draft",
            PostSpec::ScheduledIn(_) | PostSpec::ScheduledAt(_) => "Scheduled",
        }
    }

    fn published_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match *self {
            PostSpec::Published => Some(now - Duration::minutes(PUBLISHED_OFFSET_MINUTES)),
            PostSpec::Draft => None,
            PostSpec::ScheduledIn(offset) => {
                Some(now.checked_add_signed(offset).unwrap_or(DateTime::<Utc>::MAX_UTC))
            }
            PostSpec::ScheduledAt(at) => Some(at),
        }
    }
}

/// Counts per status plus explicit schedule targets.
#[derive(Debug, Clone, Default)]
pub struct GenerationPlan {
    pub published: usize,
    pub drafts: usize,
    pub scheduled_in_minutes: Vec<i64>,
    pub scheduled_at: Vec<DateTime<Utc>>,
}

impl GenerationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(mut self, count: usize) -> Self {
        self.published = count;
        self
    }

    pub fn drafts(mut self, count: usize) -> Self {
        self.drafts = count;
        self
    }

    pub fn scheduled_in_minutes(mut self, minutes: i64) -> Self {
        self.scheduled_in_minutes.push(minutes);
        self
    }

    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_at.push(at);
        self
    }

    /// Number of posts the plan creates.
    pub fn len(&self) -> usize {
        self.published
            .saturating_add(self.drafts)
            .saturating_add(self.scheduled_in_minutes.len())
            .saturating_add(self.scheduled_at.len())
    }

    /// Scheduled targets must lie in the future and within the representable
    /// range, and the batch must not exceed [`MAX_BATCH`].
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut problems = Vec::new();

        if self.len() > MAX_BATCH {
            problems.push(format!(
                "plan creates {} posts, at most {MAX_BATCH} are allowed",
                self.len()
            ));
        }

        for m in &self.scheduled_in_minutes {
            if *m <= 0 {
                problems.push(format!("scheduled offset must be positive, got {m} minute(s)"));
            } else if Duration::try_minutes(*m)
                .and_then(|offset| now.checked_add_signed(offset))
                .is_none()
            {
                problems.push(format!("scheduled offset of {m} minute(s) is out of range"));
            }
        }

        problems.extend(
            self.scheduled_at
                .iter()
                .filter(|at| **at <= now)
                .map(|at| format!("scheduled instant {at} is not in the future")),
        );

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(problems))
        }
    }

    /// Published first, then scheduled, then drafts.
    pub fn specs(&self) -> Vec<PostSpec> {
        std::iter::repeat_n(PostSpec::Published, self.published)
            .chain(
                self.scheduled_in_minutes
                    .iter()
                    .map(|m| {
                        PostSpec::ScheduledIn(Duration::try_minutes(*m).unwrap_or(Duration::MAX))
                    }),
            )
            .chain(self.scheduled_at.iter().copied().map(PostSpec::ScheduledAt))
            .chain(std::iter::repeat_n(PostSpec::Draft, self.drafts))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.published == 0
            && self.drafts == 0
            && self.scheduled_in_minutes.is_empty()
            && self.scheduled_at.is_empty()
    }
}

/// Summary of a created post.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub intended_status: PostStatus,
    pub status_at_creation: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedPost {
    /// Summary of an existing post, taking its status at `now` as the intent.
    pub fn observed(post: &ContentPost, now: DateTime<Utc>) -> Self {
        let status = post.status(now);
        Self {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            intended_status: status,
            status_at_creation: status,
            published_at: post.published_at,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the failing spec in the batch.
    pub index: usize,
    pub error: RepoError,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub created: Vec<GeneratedPost>,
    pub failure: Option<BatchFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    pub fn into_result(self) -> Result<Vec<GeneratedPost>, HarnessError> {
        match self.failure {
            None => Ok(self.created),
            Some(failure) => Err(HarnessError::CreationFailed {
                succeeded: self.created.len(),
                source: failure.error,
            }),
        }
    }
}

pub struct TestDataGenerator {
    repo: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
}

impl TestDataGenerator {
    pub fn new(repo: Arc<dyn PostRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn generate(&self, plan: &GenerationPlan) -> Result<BatchOutcome, HarnessError> {
        plan.validate(self.clock.now())?;
        Ok(self.create_batch(&plan.specs()).await)
    }

    /// Create posts in order, stopping at the first failure.
    pub async fn create_batch(&self, specs: &[PostSpec]) -> BatchOutcome {
        let now = self.clock.now();
        let mut created = Vec::with_capacity(specs.len());

        for (index, spec) in specs.iter().enumerate() {
            match self.repo.save(build_post(spec, now)).await {
                Ok(post) => {
                    tracing::debug!(
                        post_id = %post.id,
                        slug = %post.slug,
                        intended = %spec.intended_status(),
                        "Test post created"
                    );
                    created.push(GeneratedPost {
                        id: post.id,
                        status_at_creation: post.status(now),
                        title: post.title,
                        slug: post.slug,
                        intended_status: spec.intended_status(),
                        published_at: post.published_at,
                        created_at: post.created_at,
                    });
                }
                Err(error) => {
                    tracing::error!(
                        index,
                        succeeded = created.len(),
                        skipped = specs.len() - index - 1,
                        error = %error,
                        "Test post creation failed, stopping batch"
                    );
                    return BatchOutcome {
                        created,
                        failure: Some(BatchFailure { index, error }),
                    };
                }
            }
        }

        tracing::info!(count = created.len(), "Test data batch created");
        BatchOutcome {
            created,
            failure: None,
        }
    }
}

fn build_post(spec: &PostSpec, now: DateTime<Utc>) -> ContentPost {
    let id = Uuid::new_v4();
    let short_id = &id.simple().to_string()[..8];
    let title = format!("[TEST] {} {short_id}", spec.label());

    let body = format!(
        "## About this post\n\n\
         This is a synthetic {status} post created to check publication. \
         It carries the `{TEST_DATA_TAG}` tag and is removed by cleanup.",
        status = spec.intended_status(),
    );

    let mut post = ContentPost::new(title, body)
        .with_excerpt(format!("Synthetic {} post", spec.intended_status()))
        .with_tags(vec![TEST_DATA_TAG.to_string()])
        .with_published_at(spec.published_at(now));
    post.id = id;
    post
}
