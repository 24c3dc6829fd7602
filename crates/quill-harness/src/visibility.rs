//! Compare the public listing against what each post is meant to be.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use quill_core::domain::PostStatus;
use quill_core::ports::{Clock, PostRepository};

use crate::generator::GeneratedPost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActualVisibility {
    Visible,
    Hidden,
    /// The listing could not be fetched.
    Error,
}

impl fmt::Display for ActualVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActualVisibility::Visible => "visible",
            ActualVisibility::Hidden => "hidden",
            ActualVisibility::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityCheck {
    pub post_id: Uuid,
    pub title: String,
    pub expected_visible: bool,
    pub actual_status: ActualVisibility,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityReport {
    pub passed: usize,
    pub failed: usize,
    pub checks: Vec<VisibilityCheck>,
}

impl VisibilityReport {
    pub fn from_checks(checks: Vec<VisibilityCheck>) -> Self {
        let passed = checks.iter().filter(|c| c.passed).count();
        Self {
            passed,
            failed: checks.len() - passed,
            checks,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Public listing ids as seen at the clock's current instant.
pub(crate) async fn visible_ids(
    repo: &dyn PostRepository,
    clock: &dyn Clock,
) -> Result<HashSet<Uuid>, quill_core::RepoError> {
    let listing = repo.list_published(clock.now()).await?;
    Ok(listing.into_iter().map(|p| p.id).collect())
}

/// Check every post against one fetch of the public listing.
///
/// Expectations come from each post's intended status, not from its
/// timestamp. Never fails: a listing error marks every check as `error`.
pub async fn verify_visibility(
    repo: &dyn PostRepository,
    clock: &dyn Clock,
    posts: &[GeneratedPost],
) -> Vec<VisibilityCheck> {
    let visible = match visible_ids(repo, clock).await {
        Ok(ids) => Some(ids),
        Err(e) => {
            tracing::error!(error = %e, posts = posts.len(), "Failed to fetch public listing");
            None
        }
    };

    posts
        .iter()
        .map(|post| {
            let expected_visible = post.intended_status == PostStatus::Published;
            let actual_status = match &visible {
                Some(ids) if ids.contains(&post.id) => ActualVisibility::Visible,
                Some(_) => ActualVisibility::Hidden,
                None => ActualVisibility::Error,
            };
            let passed = match actual_status {
                ActualVisibility::Visible => expected_visible,
                ActualVisibility::Hidden => !expected_visible,
                ActualVisibility::Error => false,
            };

            if !passed {
                tracing::warn!(
                    post_id = %post.id,
                    expected_visible,
                    actual = %actual_status,
                    "Visibility check failed"
                );
            }

            VisibilityCheck {
                post_id: post.id,
                title: post.title.clone(),
                expected_visible,
                actual_status,
                passed,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use quill_core::ports::FixedClock;
    use quill_infra::InMemoryPostRepository;

    use super::*;
    use crate::generator::{GenerationPlan, TestDataGenerator};
    use crate::testing::FailingRepository;

    #[tokio::test]
    async fn test_only_published_post_is_visible() {
        let repo = Arc::new(InMemoryPostRepository::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let generator = TestDataGenerator::new(repo.clone(), clock.clone());
        let plan = GenerationPlan::new()
            .published(1)
            .scheduled_in_minutes(10)
            .drafts(1);
        let posts = generator.generate(&plan).await.unwrap().into_result().unwrap();

        let report = VisibilityReport::from_checks(
            verify_visibility(repo.as_ref(), clock.as_ref(), &posts).await,
        );

        assert!(report.all_passed());
        assert_eq!(report.passed, 3);
        let visible: Vec<_> = report
            .checks
            .iter()
            .filter(|c| c.actual_status == ActualVisibility::Visible)
            .map(|c| c.post_id)
            .collect();
        assert_eq!(visible, vec![posts[0].id]);
        assert_eq!(repo.list_published(clock.now()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_failure_degrades_every_check() {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let seeded = Arc::new(InMemoryPostRepository::new());
        let posts = TestDataGenerator::new(seeded, clock.clone())
            .generate(&GenerationPlan::new().published(1).drafts(1))
            .await
            .unwrap()
            .into_result()
            .unwrap();

        let broken = FailingRepository::unreachable();
        let checks = verify_visibility(&broken, clock.as_ref(), &posts).await;

        assert_eq!(checks.len(), 2);
        assert!(checks.iter().all(|c| !c.passed));
        assert!(checks.iter().all(|c| c.actual_status == ActualVisibility::Error));
    }

    #[tokio::test]
    async fn test_unexpectedly_hidden_post_fails_without_error() {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let posts = TestDataGenerator::new(Arc::new(InMemoryPostRepository::new()), clock.clone())
            .generate(&GenerationPlan::new().published(1))
            .await
            .unwrap()
            .into_result()
            .unwrap();

        // Listing from a store that never received the post.
        let empty = InMemoryPostRepository::new();
        let report =
            VisibilityReport::from_checks(verify_visibility(&empty, clock.as_ref(), &posts).await);

        assert_eq!(report.failed, 1);
        assert_eq!(report.checks[0].actual_status, ActualVisibility::Hidden);
    }
}
