//! Synthetic test posts: generate, verify visibility, clean up.

use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;

use quill_core::domain::TEST_DATA_TAG;
use quill_core::ports::{Clock, PostRepository};
use quill_harness::{
    GeneratedPost, GenerationPlan, TestDataGenerator, VisibilityReport, cleanup_test_data,
    verify_visibility,
};
use quill_shared::ApiResponse;
use quill_shared::dto::GenerateTestDataRequest;

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TestDataBatch {
    pub created: Vec<GeneratedPost>,
    pub succeeded: usize,
    /// Position of the spec that failed, when the batch stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_index: Option<usize>,
}

/// POST /api/admin/test-data
pub async fn generate(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<GenerateTestDataRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let plan = GenerationPlan {
        published: req.published,
        drafts: req.drafts,
        scheduled_in_minutes: req.scheduled_in_minutes,
        scheduled_at: req.scheduled_at,
    };

    if plan.is_empty() {
        return Err(AppError::Validation(vec![
            "request at least one post".to_string(),
        ]));
    }

    let generator = TestDataGenerator::new(state.posts.clone(), state.clock.clone());
    let outcome = generator.generate(&plan).await?;

    let batch = TestDataBatch {
        succeeded: outcome.created.len(),
        failed_index: outcome.failure.as_ref().map(|f| f.index),
        created: outcome.created,
    };

    match outcome.failure {
        None => Ok(HttpResponse::Created().json(ApiResponse::ok(batch))),
        Some(failure) => {
            // Partial batches still report what was created.
            let err = AppError::from(failure.error);
            let problem = err
                .problem()
                .with_detail(format!(
                    "Stopped after {} post(s); spec {} failed",
                    batch.succeeded, failure.index
                ))
                .with_request_id(request_id.as_str());
            Ok(HttpResponse::build(err.status_code()).json(ApiResponse::partial(batch, problem)))
        }
    }
}

/// GET /api/admin/test-data/visibility
pub async fn visibility(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let now = state.clock.now();
    let posts: Vec<GeneratedPost> = state
        .posts
        .find_by_tag(TEST_DATA_TAG)
        .await?
        .iter()
        .map(|p| GeneratedPost::observed(p, now))
        .collect();

    let checks = verify_visibility(state.posts.as_ref(), state.clock.as_ref(), &posts).await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(VisibilityReport::from_checks(checks))))
}

/// DELETE /api/admin/test-data
pub async fn cleanup(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let report = cleanup_test_data(state.posts.as_ref()).await?;
    let message = format!("Deleted {} test post(s)", report.deleted);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(report, message)))
}
