//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to login to the admin area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// The caller's identity as seen by the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub role: Option<String>,
}

/// A post as served by the API, with its status derived at response time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a post. `published_at` absent means draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Full replacement of a post, keyed by the id in the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertPostRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Reset the publication instant: `null` turns the post back into a draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePostRequest {
    pub published_at: Option<DateTime<Utc>>,
}

/// Filters for the admin listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub slug: Option<String>,
}

/// Request to generate synthetic test posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateTestDataRequest {
    pub published: usize,
    pub drafts: usize,
    pub scheduled_in_minutes: Vec<i64>,
    pub scheduled_at: Vec<DateTime<Utc>>,
}

/// Character and media limits of a social platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformLimits {
    pub platform: String,
    pub char_limit: usize,
    pub media_limit: usize,
}

/// Outcome of publishing to one platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformPublishResult {
    pub platform: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPublishResponse {
    pub results: Vec<PlatformPublishResult>,
}
