//! Content store backed by a running Quill API server.
//!
//! Used by the publication harness to exercise a deployed instance. The
//! public listing goes through `/api/posts`, exactly the path readers use;
//! everything else goes through the admin endpoints with a bearer token.
//! Status filters are evaluated by the server against its own clock, so the
//! `now` argument of [`PostRepository::list_by_status`] is ignored here.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use quill_core::domain::{ContentPost, PostStatus};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};
use quill_shared::ApiResponse;
use quill_shared::dto::{PostResponse, UpsertPostRequest};

/// Connection settings for the remote store.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    pub base_url: String,
    pub admin_token: Option<String>,
    pub request_timeout: Duration,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            admin_token: None,
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl HttpStoreConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("HARNESS_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
            admin_token: std::env::var("HARNESS_ADMIN_TOKEN").ok(),
            request_timeout: Duration::from_secs(
                std::env::var("HARNESS_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ),
        }
    }
}

pub struct HttpPostRepository {
    client: Client,
    config: HttpStoreConfig,
}

impl HttpPostRepository {
    pub fn new(config: HttpStoreConfig) -> Result<Self, RepoError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.admin_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and unwrap the response envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, RepoError> {
        let response = request
            .send()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(RepoError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(RepoError::Unauthorized);
            }
            _ => {}
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| RepoError::Query(format!("invalid response body: {e}")))?;

        envelope.into_result().map_err(|problem| {
            if problem.status == 409 {
                RepoError::Constraint(problem.to_string())
            } else {
                RepoError::Query(problem.to_string())
            }
        })
    }

    async fn fetch_list(&self, request: RequestBuilder) -> Result<Vec<ContentPost>, RepoError> {
        let posts: Vec<PostResponse> = self.send(request).await?.unwrap_or_default();
        Ok(posts.into_iter().map(post_from_response).collect())
    }
}

fn post_from_response(post: PostResponse) -> ContentPost {
    ContentPost {
        id: post.id,
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        body: post.body,
        tags: post.tags,
        published_at: post.published_at,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn upsert_request(post: &ContentPost) -> UpsertPostRequest {
    UpsertPostRequest {
        title: post.title.clone(),
        slug: post.slug.clone(),
        excerpt: post.excerpt.clone(),
        body: post.body.clone(),
        tags: post.tags.clone(),
        published_at: post.published_at,
        created_at: Some(post.created_at),
    }
}

fn missing_as_none<T>(result: Result<Option<T>, RepoError>) -> Result<Option<T>, RepoError> {
    match result {
        Err(RepoError::NotFound) => Ok(None),
        other => other,
    }
}

#[async_trait]
impl BaseRepository<ContentPost, Uuid> for HttpPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContentPost>, RepoError> {
        let request = self.authed(self.client.get(self.url(&format!("/api/admin/posts/{id}"))));
        let post: Option<PostResponse> = missing_as_none(self.send(request).await)?;
        Ok(post.map(post_from_response))
    }

    async fn save(&self, post: ContentPost) -> Result<ContentPost, RepoError> {
        let request = self
            .authed(self.client.put(self.url(&format!("/api/admin/posts/{}", post.id))))
            .json(&upsert_request(&post));
        let saved: Option<PostResponse> = self.send(request).await?;
        saved
            .map(post_from_response)
            .ok_or_else(|| RepoError::Query("server returned no post".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let request = self.authed(self.client.delete(self.url(&format!("/api/admin/posts/{id}"))));
        let _: Option<serde_json::Value> = self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for HttpPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ContentPost>, RepoError> {
        let request = self
            .authed(self.client.get(self.url("/api/admin/posts")))
            .query(&[("slug", slug)]);
        Ok(self.fetch_list(request).await?.into_iter().next())
    }

    async fn list_by_status(
        &self,
        status: Option<PostStatus>,
        _now: DateTime<Utc>,
    ) -> Result<Vec<ContentPost>, RepoError> {
        let request = match status {
            Some(PostStatus::Published) => self.client.get(self.url("/api/posts")),
            Some(other) => self
                .authed(self.client.get(self.url("/api/admin/posts")))
                .query(&[("status", other.as_str())]),
            None => self.authed(self.client.get(self.url("/api/admin/posts"))),
        };
        self.fetch_list(request).await
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<ContentPost>, RepoError> {
        let request = self
            .authed(self.client.get(self.url("/api/admin/posts")))
            .query(&[("tag", tag)]);
        self.fetch_list(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let repo = HttpPostRepository::new(HttpStoreConfig {
            base_url: "http://cms.test/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(repo.url("/api/posts"), "http://cms.test/api/posts");
    }

    #[test]
    fn test_upsert_request_carries_every_field() {
        let post = ContentPost::new("Remote".to_string(), "body".to_string())
            .with_tags(vec!["a".to_string()])
            .with_published_at(Some(Utc::now()));
        let request = upsert_request(&post);
        assert_eq!(request.slug, "remote");
        assert_eq!(request.published_at, post.published_at);
        assert_eq!(request.created_at, Some(post.created_at));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let repo = HttpPostRepository::new(HttpStoreConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();
        let result = repo.find_by_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::Connection(_))));
    }
}
