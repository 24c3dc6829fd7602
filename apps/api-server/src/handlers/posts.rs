//! Public blog listing. Only posts published at request time are served.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};

use quill_core::domain::ContentPost;
use quill_core::ports::{Clock, PostRepository};
use quill_shared::ApiResponse;
use quill_shared::dto::PostResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Render a post with its status derived at `now`.
pub(crate) fn post_response(post: ContentPost, now: DateTime<Utc>) -> PostResponse {
    PostResponse {
        status: post.status(now).to_string(),
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

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let now = state.clock.now();
    let posts = state.posts.list_published(now).await?;

    let data: Vec<PostResponse> = posts
        .into_iter()
        .map(|post| post_response(post, now))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// GET /api/posts/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let now = state.clock.now();

    // Drafts and scheduled posts are indistinguishable from missing ones.
    let post = state
        .posts
        .find_by_slug(&slug)
        .await?
        .filter(|p| p.status(now).is_publicly_visible())
        .ok_or_else(|| AppError::NotFound(format!("No published post with slug `{slug}`")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post, now))))
}
