use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::http::{StatusCode, header};
use actix_web::middleware::from_fn;
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::RepoError;
use quill_core::domain::{ContentPost, PostStatus, SocialPlatform};
use quill_core::ports::{
    ADMIN_ROLE, BaseRepository, Clock, FixedClock, PasswordService, PostRepository, RateLimiter,
};
use quill_infra::{Argon2PasswordService, DryRunSocialPublisher, InMemoryPostRepository, JwtConfig};

use super::configure_app;
use crate::config::{AdminCredentials, AppConfig};
use crate::observability::propagate_request_id;
use crate::state::AppState;

const ADMIN_EMAIL: &str = "editor@quill.test";
const ADMIN_PASSWORD: &str = "correct horse battery staple";

fn config() -> AppConfig {
    let hash = Argon2PasswordService::new().hash(ADMIN_PASSWORD).unwrap();
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: None,
        jwt: JwtConfig {
            secret: "handler-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "quill-test".to_string(),
        },
        admin: Some(AdminCredentials {
            id: Uuid::new_v4(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash,
        }),
        #[cfg(feature = "rate-limit")]
        rate_limit: None,
    }
}

/// In-memory store whose `n`th save (1-based) loses its connection.
struct FlakyStore {
    inner: InMemoryPostRepository,
    fail_on: usize,
    saves: AtomicUsize,
}

impl FlakyStore {
    fn failing_on_save(fail_on: usize) -> Self {
        Self {
            inner: InMemoryPostRepository::new(),
            fail_on,
            saves: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BaseRepository<ContentPost, Uuid> for FlakyStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContentPost>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, post: ContentPost) -> Result<ContentPost, RepoError> {
        if self.saves.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
            return Err(RepoError::Connection("connection reset by peer".to_string()));
        }
        self.inner.save(post).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl PostRepository for FlakyStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ContentPost>, RepoError> {
        self.inner.find_by_slug(slug).await
    }

    async fn list_by_status(
        &self,
        status: Option<PostStatus>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContentPost>, RepoError> {
        self.inner.list_by_status(status, now).await
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<ContentPost>, RepoError> {
        self.inner.find_by_tag(tag).await
    }
}

struct Harness {
    state: AppState,
    clock: Arc<FixedClock>,
}

impl Harness {
    fn new() -> Self {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let state = AppState::in_memory(&config(), clock.clone());
        Self { state, clock }
    }

    fn token(&self, roles: &[&str]) -> String {
        self.state
            .tokens
            .generate_token(
                Uuid::new_v4(),
                ADMIN_EMAIL,
                roles.iter().map(|r| r.to_string()).collect(),
            )
            .unwrap()
    }

    fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token(&[ADMIN_ROLE])))
    }
}

macro_rules! app {
    ($state:expr) => {
        app!($state, None)
    };
    ($state:expr, $limiter:expr) => {{
        let limiter: Option<Arc<dyn RateLimiter>> = $limiter;
        test::init_service(
            App::new()
                .wrap(from_fn(propagate_request_id))
                .app_data(web::Data::new($state.clone()))
                .configure(|cfg| configure_app(cfg, limiter)),
        )
        .await
    }};
}

#[actix_rt::test]
async fn test_health_echoes_request_id() {
    let h = Harness::new();
    let app = app!(h.state);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "req-123"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-request-id").unwrap(), "req-123");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["content_store"], "in_memory");
}

#[actix_rt::test]
async fn test_admin_routes_require_admin() {
    let h = Harness::new();
    let app = app!(h.state);

    let anonymous = test::TestRequest::get().uri("/api/admin/posts").to_request();
    let res = test::call_service(&app, anonymous).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["status"], 401);

    let viewer = test::TestRequest::get()
        .uri("/api/admin/posts")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", h.token(&["viewer"]))))
        .to_request();
    assert_eq!(test::call_service(&app, viewer).await.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_login_and_me() {
    let h = Harness::new();
    let app = app!(h.state);

    let wrong = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": ADMIN_EMAIL, "password": "nope" }))
        .to_request();
    assert_eq!(test::call_service(&app, wrong).await.status(), StatusCode::UNAUTHORIZED);

    let login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "EDITOR@quill.test", "password": ADMIN_PASSWORD }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, login).await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["expires_in"], 3600);

    let me = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, me).await;
    assert_eq!(body["data"]["is_admin"], true);
    assert_eq!(body["data"]["role"], "admin");
}

#[actix_rt::test]
async fn test_public_listing_hides_drafts_and_scheduled_posts() {
    let h = Harness::new();
    let app = app!(h.state);
    let now = h.clock.now();

    for (title, published_at) in [
        ("Already live", Some(now - Duration::hours(1))),
        ("Coming soon", Some(now + Duration::minutes(10))),
        ("Work in progress", None),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(h.bearer())
            .set_json(json!({ "title": title, "body": "text", "published_at": published_at }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let listing: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/posts").to_request())
            .await;
    let posts = listing["data"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["slug"], "already-live");
    assert_eq!(posts[0]["status"], "published");

    let hidden = test::TestRequest::get().uri("/api/posts/coming-soon").to_request();
    assert_eq!(test::call_service(&app, hidden).await.status(), StatusCode::NOT_FOUND);

    let scheduled = test::TestRequest::get()
        .uri("/api/admin/posts?status=scheduled")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, scheduled).await;
    assert_eq!(body["data"][0]["slug"], "coming-soon");

    // Time passing is enough; nothing is written.
    h.clock.advance(Duration::minutes(10));
    let listing: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/posts").to_request())
            .await;
    assert_eq!(listing["data"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_upsert_is_idempotent_and_schedule_resets_status() {
    let h = Harness::new();
    let app = app!(h.state);
    let id = Uuid::new_v4();
    let body = json!({ "title": "Upserted", "slug": "upserted", "body": "text" });

    let first = test::TestRequest::put()
        .uri(&format!("/api/admin/posts/{id}"))
        .insert_header(h.bearer())
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::CREATED);

    let again = test::TestRequest::put()
        .uri(&format!("/api/admin/posts/{id}"))
        .insert_header(h.bearer())
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, again).await.status(), StatusCode::OK);

    let schedule = test::TestRequest::put()
        .uri(&format!("/api/admin/posts/{id}/schedule"))
        .insert_header(h.bearer())
        .set_json(json!({ "published_at": h.clock.now() + Duration::minutes(5) }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, schedule).await;
    assert_eq!(body["data"]["status"], "scheduled");

    let delete = test::TestRequest::delete()
        .uri(&format!("/api/admin/posts/{id}"))
        .insert_header(h.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::OK);

    let missing = test::TestRequest::get()
        .uri(&format!("/api/admin/posts/{id}"))
        .insert_header(h.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, missing).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_invalid_post_is_rejected() {
    let h = Harness::new();
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts")
        .insert_header(h.bearer())
        .set_json(json!({ "title": " ", "slug": "Not A Slug" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"]["errors"].as_array().unwrap().len(), 2);

    let bad_filter = test::TestRequest::get()
        .uri("/api/admin/posts?status=archived")
        .insert_header(h.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, bad_filter).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_admin_entry_redirects_non_admins() {
    let h = Harness::new();
    let app = app!(h.state);

    let res = test::call_service(&app, test::TestRequest::get().uri("/admin").to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login?next=/admin");

    let admin = test::TestRequest::get().uri("/admin").insert_header(h.bearer()).to_request();
    assert_eq!(test::call_service(&app, admin).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_social_limits_are_enforced_per_platform() {
    let h = Harness::new();
    let app = app!(h.state);
    let text = "x".repeat(281);

    let twitter = test::TestRequest::post()
        .uri("/api/social/posts")
        .insert_header(h.bearer())
        .set_json(json!({ "platforms": ["twitter", "linkedin"], "text": text }))
        .to_request();
    assert_eq!(
        test::call_service(&app, twitter).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let linkedin = test::TestRequest::post()
        .uri("/api/social/posts")
        .insert_header(h.bearer())
        .set_json(json!({ "platforms": ["linkedin"], "text": text }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, linkedin).await;
    assert_eq!(body["data"]["results"][0]["platform"], "linkedin");
    assert_eq!(body["data"]["results"][0]["success"], true);
}

#[actix_rt::test]
async fn test_test_data_lifecycle() {
    let h = Harness::new();
    let app = app!(h.state);

    let generate = test::TestRequest::post()
        .uri("/api/admin/test-data")
        .insert_header(h.bearer())
        .set_json(json!({ "published": 1, "drafts": 1, "scheduled_in_minutes": [10] }))
        .to_request();
    let res = test::call_service(&app, generate).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["succeeded"], 3);

    let visibility = test::TestRequest::get()
        .uri("/api/admin/test-data/visibility")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, visibility).await;
    assert_eq!(body["data"]["passed"], 3);
    assert_eq!(body["data"]["failed"], 0);

    let cleanup = test::TestRequest::delete()
        .uri("/api/admin/test-data")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, cleanup).await;
    assert_eq!(body["data"]["deleted"], 3);
}

#[actix_rt::test]
async fn test_partial_batch_reports_created_posts_and_first_error() {
    let mut h = Harness::new();
    h.state.posts = Arc::new(FlakyStore::failing_on_save(3));
    let app = app!(h.state);

    let generate = test::TestRequest::post()
        .uri("/api/admin/test-data")
        .insert_header(h.bearer())
        .insert_header(("X-Request-ID", "batch-42"))
        .set_json(json!({ "published": 5 }))
        .to_request();
    let res = test::call_service(&app, generate).await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["succeeded"], 2);
    assert_eq!(body["data"]["failed_index"], 2);
    assert_eq!(body["data"]["created"].as_array().unwrap().len(), 2);
    assert_eq!(body["error"]["status"], 503);
    assert_eq!(body["error"]["request_id"], "batch-42");
    assert!(body["error"]["detail"].as_str().unwrap().contains("Stopped after 2 post(s)"));

    let listing = test::TestRequest::get()
        .uri("/api/admin/posts?tag=test-data")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, listing).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_one_platform_failing_does_not_hide_the_other() {
    let mut h = Harness::new();
    h.state.social =
        Arc::new(DryRunSocialPublisher::new().with_offline(SocialPlatform::Linkedin));
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/social/posts")
        .insert_header(h.bearer())
        .set_json(json!({ "platforms": ["twitter", "linkedin"], "text": "New post is up" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "1 of 2 platform(s) accepted the post");

    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["platform"], "twitter");
    assert_eq!(results[0]["success"], true);
    assert!(results[0]["external_id"].as_str().unwrap().starts_with("dry-run-"));
    assert_eq!(results[1]["platform"], "linkedin");
    assert_eq!(results[1]["success"], false);
    assert!(results[1]["error"].as_str().unwrap().contains("unavailable"));
    assert!(results[1].get("external_id").is_none());
}

#[actix_rt::test]
async fn test_analysis_reports_every_card() {
    let h = Harness::new();
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/admin/analysis")
        .insert_header(h.bearer())
        .set_json(json!({
            "title": "How we cut our build times in half with incremental caching",
            "body": "## Why\n\nYou can make your builds faster. Start with caching.",
            "keywords": ["build times"],
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    for card in ["seo", "readability", "brand_voice"] {
        let score = body["data"][card]["score"].as_u64().unwrap();
        assert!(score <= 100);
    }
    assert!(body["data"]["overall"].as_u64().unwrap() <= 100);
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_public_listing_is_rate_limited() {
    use quill_infra::{InMemoryRateLimiter, RateLimitConfig};

    let h = Harness::new();
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: 1,
        window: std::time::Duration::from_secs(60),
    }));
    let app = app!(h.state, Some(limiter));

    let first = test::TestRequest::get().uri("/api/posts").to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::OK);

    let second = test::TestRequest::get().uri("/api/posts").to_request();
    let res = test::call_service(&app, second).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key(header::RETRY_AFTER));
}
