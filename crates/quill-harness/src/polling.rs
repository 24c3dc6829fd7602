//! Wait for scheduled posts to reach the public listing.
//!
//! The loop has two terminal outcomes, [`PollOutcome::Published`] and
//! [`PollOutcome::TimedOut`]. The timeout is the only bound; there is no
//! cancellation signal.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use uuid::Uuid;

use quill_core::ports::{Clock, PostRepository};

use crate::visibility::{ActualVisibility, visible_ids};

/// Shortest pause between two listing queries.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollConfig {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            timeout,
        }
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secs = |key: &str| {
            std::env::var(key)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        Self::new(
            secs("HARNESS_POLL_INTERVAL_SECS").unwrap_or(defaults.interval),
            secs("HARNESS_TIMEOUT_SECS").unwrap_or(defaults.timeout),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LastSeen {
    pub post_id: Uuid,
    pub status: ActualVisibility,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    Published {
        elapsed: Duration,
        checks: u32,
    },
    TimedOut {
        elapsed: Duration,
        checks: u32,
        last_seen: Vec<LastSeen>,
    },
}

impl PollOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PollOutcome::Published { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            PollOutcome::Published { elapsed, .. } | PollOutcome::TimedOut { elapsed, .. } => {
                *elapsed
            }
        }
    }
}

/// Poll the public listing until every id is visible or the timeout passes.
///
/// A failed listing counts as "not visible yet" and is retried on the next
/// tick. At least one check always runs, even when the interval exceeds the
/// timeout.
pub async fn wait_for_publication(
    repo: &dyn PostRepository,
    clock: &dyn Clock,
    ids: &[Uuid],
    config: PollConfig,
) -> PollOutcome {
    let start = Instant::now();
    let interval = config.interval.max(MIN_POLL_INTERVAL);

    if ids.is_empty() {
        return PollOutcome::Published {
            elapsed: Duration::ZERO,
            checks: 0,
        };
    }

    tracing::info!(
        posts = ids.len(),
        interval_secs = interval.as_secs(),
        timeout_secs = config.timeout.as_secs(),
        "Waiting for scheduled posts to publish"
    );

    let mut checks = 0u32;
    loop {
        checks += 1;

        let last_seen: Vec<LastSeen> = match visible_ids(repo, clock).await {
            Ok(visible) => ids
                .iter()
                .map(|id| LastSeen {
                    post_id: *id,
                    status: if visible.contains(id) {
                        ActualVisibility::Visible
                    } else {
                        ActualVisibility::Hidden
                    },
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, check = checks, "Public listing query failed, retrying");
                ids.iter()
                    .map(|id| LastSeen {
                        post_id: *id,
                        status: ActualVisibility::Error,
                    })
                    .collect()
            }
        };

        let elapsed = start.elapsed();
        let pending = last_seen
            .iter()
            .filter(|s| s.status != ActualVisibility::Visible)
            .count();

        if pending == 0 {
            tracing::info!(elapsed_secs = elapsed.as_secs(), checks, "All posts published");
            return PollOutcome::Published { elapsed, checks };
        }

        if elapsed >= config.timeout {
            for seen in last_seen.iter().filter(|s| s.status != ActualVisibility::Visible) {
                tracing::warn!(post_id = %seen.post_id, last_seen = %seen.status, "Post not published before timeout");
            }
            tracing::error!(elapsed_secs = elapsed.as_secs(), checks, pending, "Publication polling timed out");
            return PollOutcome::TimedOut {
                elapsed,
                checks,
                last_seen,
            };
        }

        tracing::debug!(pending, check = checks, "Posts still pending");
        // Never sleep past the deadline.
        tokio::time::sleep(interval.min(config.timeout - elapsed)).await;
    }
}
