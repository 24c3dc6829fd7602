//! Rate limiting port for the public API.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record a request for `key` and report whether it may proceed.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_after: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limiter backend error: {0}")]
    Backend(String),
}
