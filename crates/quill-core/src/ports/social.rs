//! Social publishing port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{SocialPlatform, SocialPost};

/// Acknowledgement returned by a platform.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReceipt {
    pub platform: SocialPlatform,
    pub external_id: String,
    pub accepted_at: DateTime<Utc>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Pushes an already validated post to one platform.
#[async_trait]
pub trait SocialPublisher: Send + Sync {
    async fn publish(
        &self,
        platform: SocialPlatform,
        post: &SocialPost,
    ) -> Result<PublishReceipt, SocialError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("{platform} is unavailable: {source}")]
    Unavailable {
        platform: SocialPlatform,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
