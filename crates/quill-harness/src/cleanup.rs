use serde::Serialize;

use quill_core::domain::TEST_DATA_TAG;
use quill_core::ports::{BaseRepository, PostRepository};

use crate::error::HarnessError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
}

/// Delete every post tagged as test data.
///
/// Individual delete failures are logged and counted; only a failure to
/// list the tagged posts is returned as an error.
pub async fn cleanup_test_data(repo: &dyn PostRepository) -> Result<CleanupReport, HarnessError> {
    let posts = repo.find_by_tag(TEST_DATA_TAG).await?;
    let mut report = CleanupReport::default();

    for post in posts.iter().filter(|p| p.is_test_data()) {
        match repo.delete(post.id).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                tracing::warn!(post_id = %post.id, error = %e, "Failed to delete test post");
                report.failed += 1;
            }
        }
    }

    tracing::info!(deleted = report.deleted, failed = report.failed, "Test data cleaned up");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use quill_core::domain::ContentPost;
    use quill_core::ports::FixedClock;
    use quill_infra::InMemoryPostRepository;

    use super::*;
    use crate::generator::{GenerationPlan, TestDataGenerator};

    #[tokio::test]
    async fn test_only_tagged_posts_are_removed() {
        let repo = Arc::new(InMemoryPostRepository::new());
        let keep = repo
            .save(ContentPost::new("Real article".to_string(), "body".to_string()))
            .await
            .unwrap();
        TestDataGenerator::new(repo.clone(), Arc::new(FixedClock::new(Utc::now())))
            .generate(&GenerationPlan::new().published(2).drafts(1))
            .await
            .unwrap();

        let report = cleanup_test_data(repo.as_ref()).await.unwrap();

        assert_eq!(report, CleanupReport { deleted: 3, failed: 0 });
        assert_eq!(repo.len().await, 1);
        assert!(repo.find_by_id(keep.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_store_is_a_no_op() {
        let repo = InMemoryPostRepository::new();
        assert_eq!(cleanup_test_data(&repo).await.unwrap(), CleanupReport::default());
    }
}
