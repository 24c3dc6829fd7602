use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slug::slugify;
use uuid::Uuid;

use super::status::{PostStatus, derive_status};
use crate::error::DomainError;

/// Tag carried by synthetic posts created for publication checks.
pub const TEST_DATA_TAG: &str = "test-data";

/// Content post - a blog article managed through the admin area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentPost {
    /// Create a new draft post with a slug derived from the title.
    pub fn new(title: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&title),
            title,
            excerpt: String::new(),
            body,
            tags: Vec::new(),
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.published_at = published_at;
        self
    }

    /// Status of this post as seen at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> PostStatus {
        derive_status(self.published_at, now)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_test_data(&self) -> bool {
        self.has_tag(TEST_DATA_TAG)
    }

    /// Authoring rules: a title, and a slug made of lowercase ascii
    /// letters, digits and single hyphens.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut problems = Vec::new();

        if self.title.trim().is_empty() {
            problems.push("title must not be empty".to_string());
        }
        if !is_valid_slug(&self.slug) {
            problems.push(format!("slug `{}` is not a valid URL slug", self.slug));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(problems))
        }
    }

    /// Reset the publication instant. This is the only lifecycle mutation.
    pub fn reschedule(&mut self, published_at: Option<DateTime<Utc>>) {
        self.published_at = published_at;
        self.updated_at = Utc::now();
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
