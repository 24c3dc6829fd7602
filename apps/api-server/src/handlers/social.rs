//! Social post submission.

use actix_web::{HttpResponse, web};

use quill_core::domain::{SocialPlatform, SocialPost};
use quill_core::ports::Clock;
use quill_shared::ApiResponse;
use quill_shared::dto::{PlatformLimits, PlatformPublishResult, SocialPublishResponse};

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/social/platforms
pub async fn platforms(_admin: AdminIdentity) -> HttpResponse {
    let limits: Vec<PlatformLimits> = SocialPlatform::ALL
        .iter()
        .map(|p| PlatformLimits {
            platform: p.to_string(),
            char_limit: p.char_limit(),
            media_limit: p.media_limit(),
        })
        .collect();

    HttpResponse::Ok().json(ApiResponse::ok(limits))
}

/// POST /api/social/posts
///
/// Nothing is submitted unless every platform's limits are met. Platforms
/// are then published to one by one and each reports its own result.
pub async fn publish(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<SocialPost>,
) -> AppResult<HttpResponse> {
    let post = body.into_inner();
    post.validate(state.clock.now())?;

    let mut targets: Vec<SocialPlatform> = Vec::with_capacity(post.platforms.len());
    for platform in &post.platforms {
        if !targets.contains(platform) {
            targets.push(*platform);
        }
    }

    let mut results = Vec::with_capacity(targets.len());
    for platform in targets {
        let result = match state.social.publish(platform, &post).await {
            Ok(receipt) => PlatformPublishResult {
                platform: platform.to_string(),
                success: true,
                external_id: Some(receipt.external_id),
                error: None,
            },
            Err(e) => {
                tracing::error!(%platform, error = %e, "Social publish failed");
                PlatformPublishResult {
                    platform: platform.to_string(),
                    success: false,
                    external_id: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    let accepted = results.iter().filter(|r| r.success).count();
    tracing::info!(
        author = %admin.0.email,
        accepted,
        requested = results.len(),
        "Social post submitted"
    );

    let message = format!("{accepted} of {} platform(s) accepted the post", results.len());
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        SocialPublishResponse { results },
        message,
    )))
}
