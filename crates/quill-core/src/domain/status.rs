//! Derived publication status.
//!
//! A post never stores its status. It is computed from the optional
//! `published_at` instant and the caller's notion of "now", so a scheduled
//! post becomes published simply by time passing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of a post at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }

    /// Only published posts appear in the public listing.
    pub fn is_publicly_visible(self) -> bool {
        matches!(self, PostStatus::Published)
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status `{other}`")),
        }
    }
}

/// Derive the status of a post from its publication instant.
///
/// `published_at == now` resolves to [`PostStatus::Published`]. Callers read
/// the clock once and pass the same `now` to every derivation in an
/// operation.
pub fn derive_status(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> PostStatus {
    match published_at {
        None => PostStatus::Draft,
        Some(at) if at > now => PostStatus::Scheduled,
        Some(_) => PostStatus::Published,
    }
}
