//! Admin authoring endpoints.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{ContentPost, PostStatus};
use quill_core::ports::{BaseRepository, Clock, PostRepository};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, PostListQuery, SchedulePostRequest, UpsertPostRequest};

use super::posts::post_response;
use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_status(raw: Option<&str>) -> AppResult<Option<PostStatus>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<PostStatus>().map_err(AppError::BadRequest))
        .transpose()
}

/// GET /api/admin/posts?status=&tag=&slug=
pub async fn list(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let status = parse_status(query.status.as_deref())?;
    let now = state.clock.now();

    let posts = match (query.slug.as_deref(), query.tag.as_deref()) {
        (Some(slug), _) => state.posts.find_by_slug(slug).await?.into_iter().collect(),
        (None, Some(tag)) => state.posts.find_by_tag(tag).await?,
        (None, None) => state.posts.list_by_status(status, now).await?,
    };

    let data: Vec<_> = posts
        .into_iter()
        .filter(|p| status.is_none_or(|s| p.status(now) == s))
        .map(|p| post_response(p, now))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// POST /api/admin/posts
pub async fn create(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut post = ContentPost::new(req.title, req.body)
        .with_excerpt(req.excerpt)
        .with_tags(req.tags)
        .with_published_at(req.published_at);
    if let Some(slug) = req.slug.filter(|s| !s.trim().is_empty()) {
        post = post.with_slug(slug.trim());
    }
    post.validate()?;

    let saved = state.posts.save(post).await?;
    let now = state.clock.now();

    tracing::info!(
        post_id = %saved.id,
        slug = %saved.slug,
        status = %saved.status(now),
        author = %admin.0.email,
        "Post created"
    );

    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(saved, now))))
}

/// GET /api/admin/posts/{id}
pub async fn get(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = find(&state, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post, state.clock.now()))))
}

/// PUT /api/admin/posts/{id}
///
/// Idempotent: replaying the same body yields the same post.
pub async fn upsert(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpsertPostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    let now = state.clock.now();
    let existing = state.posts.find_by_id(id).await?;

    let created_at = existing
        .as_ref()
        .map(|p| p.created_at)
        .or(req.created_at)
        .unwrap_or(now);

    let post = ContentPost {
        id,
        title: req.title,
        slug: req.slug,
        excerpt: req.excerpt,
        body: req.body,
        tags: req.tags,
        published_at: req.published_at,
        created_at,
        updated_at: now,
    };
    post.validate()?;

    let saved = state.posts.save(post).await?;
    tracing::info!(post_id = %id, created = existing.is_none(), "Post upserted");

    let response = ApiResponse::ok(post_response(saved, now));
    Ok(if existing.is_none() {
        HttpResponse::Created().json(response)
    } else {
        HttpResponse::Ok().json(response)
    })
}

/// PUT /api/admin/posts/{id}/schedule
pub async fn schedule(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SchedulePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut post = find(&state, id).await?;

    post.reschedule(body.into_inner().published_at);
    let saved = state.posts.save(post).await?;
    let now = state.clock.now();

    tracing::info!(
        post_id = %id,
        published_at = ?saved.published_at,
        status = %saved.status(now),
        "Post rescheduled"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(saved, now))))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id).await.map_err(|e| match e {
        quill_core::RepoError::NotFound => AppError::NotFound(format!("Post {id} not found")),
        other => other.into(),
    })?;

    tracing::info!(post_id = %id, "Post deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Post deleted")))
}

async fn find(state: &AppState, id: Uuid) -> AppResult<ContentPost> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))
}
