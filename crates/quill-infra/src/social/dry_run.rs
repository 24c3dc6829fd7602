//! Publisher that accepts every post without contacting a network.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use quill_core::domain::{SocialPlatform, SocialPost};
use quill_core::ports::{PublishReceipt, SocialError, SocialPublisher};

/// Most recent submissions kept for inspection.
pub const SUBMISSION_LOG_CAPACITY: usize = 100;

/// Logs and records each submission, then returns a synthetic receipt.
///
/// Only the last [`SUBMISSION_LOG_CAPACITY`] submissions are kept. Platforms
/// listed in `offline` answer with [`SocialError::Unavailable`], which lets
/// callers exercise partial failures.
#[derive(Default)]
pub struct DryRunSocialPublisher {
    submitted: Mutex<VecDeque<(SocialPlatform, SocialPost)>>,
    offline: Vec<SocialPlatform>,
}

impl DryRunSocialPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offline(mut self, platform: SocialPlatform) -> Self {
        self.offline.push(platform);
        self
    }

    /// Recently accepted posts, oldest first.
    pub async fn submitted(&self) -> Vec<(SocialPlatform, SocialPost)> {
        self.submitted.lock().await.iter().cloned().collect()
    }
}

#[async_trait]
impl SocialPublisher for DryRunSocialPublisher {
    async fn publish(
        &self,
        platform: SocialPlatform,
        post: &SocialPost,
    ) -> Result<PublishReceipt, SocialError> {
        if self.offline.contains(&platform) {
            tracing::warn!(%platform, "Dry-run platform marked offline");
            return Err(SocialError::Unavailable {
                platform,
                source: "platform offline in dry-run mode".into(),
            });
        }

        let receipt = PublishReceipt {
            platform,
            external_id: format!("dry-run-{}", Uuid::new_v4().simple()),
            accepted_at: Utc::now(),
            scheduled_at: post.scheduled_at,
        };

        tracing::info!(
            %platform,
            external_id = %receipt.external_id,
            chars = post.text.chars().count(),
            media = post.media_urls.len(),
            scheduled_at = ?post.scheduled_at,
            "Social post accepted (dry run)"
        );

        let mut submitted = self.submitted.lock().await;
        if submitted.len() == SUBMISSION_LOG_CAPACITY {
            submitted.pop_front();
        }
        submitted.push_back((platform, post.clone()));

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> SocialPost {
        SocialPost {
            platforms: vec![SocialPlatform::Twitter, SocialPlatform::Linkedin],
            text: "New article on the blog".to_string(),
            media_urls: vec![],
            scheduled_at: None,
        }
    }

    #[tokio::test]
    async fn test_records_submissions() {
        let publisher = DryRunSocialPublisher::new();
        let receipt = publisher
            .publish(SocialPlatform::Twitter, &post())
            .await
            .unwrap();

        assert_eq!(receipt.platform, SocialPlatform::Twitter);
        assert!(receipt.external_id.starts_with("dry-run-"));
        assert_eq!(publisher.submitted().await.len(), 1);
    }

    #[tokio::test]
    async fn test_offline_platform_fails_alone() {
        let publisher = DryRunSocialPublisher::new().with_offline(SocialPlatform::Linkedin);

        let linkedin = publisher.publish(SocialPlatform::Linkedin, &post()).await;
        assert!(matches!(linkedin, Err(SocialError::Unavailable { .. })));

        assert!(publisher.publish(SocialPlatform::Twitter, &post()).await.is_ok());
        assert_eq!(publisher.submitted().await.len(), 1);
    }

    #[tokio::test]
    async fn test_submission_log_is_bounded() {
        let publisher = DryRunSocialPublisher::new();
        for i in 0..SUBMISSION_LOG_CAPACITY + 5 {
            let mut post = post();
            post.text = format!("post {i}");
            publisher.publish(SocialPlatform::Twitter, &post).await.unwrap();
        }

        let submitted = publisher.submitted().await;
        assert_eq!(submitted.len(), SUBMISSION_LOG_CAPACITY);
        assert_eq!(submitted[0].1.text, "post 5");
    }
}
