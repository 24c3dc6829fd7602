//! Social posts composed in the admin area.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Social platforms a post can be pushed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    Twitter,
    Linkedin,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 2] = [SocialPlatform::Twitter, SocialPlatform::Linkedin];

    pub fn as_str(self) -> &'static str {
        match self {
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Linkedin => "linkedin",
        }
    }

    /// Maximum post length in characters.
    pub fn char_limit(self) -> usize {
        match self {
            SocialPlatform::Twitter => 280,
            SocialPlatform::Linkedin => 3000,
        }
    }

    /// Maximum number of attached media.
    pub fn media_limit(self) -> usize {
        match self {
            SocialPlatform::Twitter => 4,
            SocialPlatform::Linkedin => 9,
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A social post awaiting submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPost {
    pub platforms: Vec<SocialPlatform>,
    pub text: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl SocialPost {
    /// Check every platform constraint before anything is submitted.
    ///
    /// All problems are collected so the author sees them at once.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut problems = Vec::new();

        if self.platforms.is_empty() {
            problems.push("select at least one platform".to_string());
        }

        let text_len = self.text.trim().chars().count();
        if text_len == 0 {
            problems.push("text must not be empty".to_string());
        }

        for platform in &self.platforms {
            if text_len > platform.char_limit() {
                problems.push(format!(
                    "text is {} characters, {} allows {}",
                    text_len,
                    platform,
                    platform.char_limit()
                ));
            }
            if self.media_urls.len() > platform.media_limit() {
                problems.push(format!(
                    "{} media attached, {} allows {}",
                    self.media_urls.len(),
                    platform,
                    platform.media_limit()
                ));
            }
        }

        for url in &self.media_urls {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                problems.push(format!("media url `{url}` is not an http(s) url"));
            }
        }

        if let Some(at) = self.scheduled_at {
            if at <= now {
                problems.push("scheduled time must be in the future".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(problems))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(platforms: Vec<SocialPlatform>, text: &str) -> SocialPost {
        SocialPost {
            platforms,
            text: text.to_string(),
            media_urls: vec![],
            scheduled_at: None,
        }
    }

    fn problems(result: Result<(), DomainError>) -> Vec<String> {
        match result {
            Err(DomainError::Validation(problems)) => problems,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_twitter_limit_applies_only_to_twitter() {
        let text = "a".repeat(281);
        let now = Utc::now();

        assert!(post(vec![SocialPlatform::Linkedin], &text).validate(now).is_ok());

        let errs = problems(post(vec![SocialPlatform::Twitter], &text).validate(now));
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("twitter allows 280"));
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let text = "a".repeat(280);
        assert!(post(vec![SocialPlatform::Twitter], &text).validate(Utc::now()).is_ok());
    }

    #[test]
    fn test_collects_every_problem() {
        let mut social = post(vec![], "   ");
        social.media_urls = vec!["ftp://files/x.png".to_string()];
        social.scheduled_at = Some(Utc::now() - Duration::minutes(1));

        let errs = problems(social.validate(Utc::now()));
        assert_eq!(errs.len(), 4);
    }

    #[test]
    fn test_media_limit() {
        let mut social = post(SocialPlatform::ALL.to_vec(), "New case study is live");
        social.media_urls = (0..5).map(|i| format!("https://cdn.test/{i}.png")).collect();

        let errs = problems(social.validate(Utc::now()));
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("twitter allows 4"));
    }
}
