//! Content scoring endpoint.

use actix_web::{HttpResponse, web};

use quill_core::analysis::{ContentAnalysis, ContentInput, brand_voice, readability, seo};
use quill_shared::ApiResponse;

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};

/// POST /api/admin/analysis
///
/// The three checklists are independent, so they run concurrently.
pub async fn analyze(
    _admin: AdminIdentity,
    body: web::Json<ContentInput>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner();

    if input.title.trim().is_empty() && input.body.trim().is_empty() {
        return Err(AppError::Validation(vec![
            "provide at least a title or a body to analyze".to_string(),
        ]));
    }

    let visible_text = input.visible_text();
    let (seo, readability, brand_voice) = tokio::join!(
        async { seo::analyze(&input) },
        async { readability::analyze(&input.body) },
        async { brand_voice::analyze(&visible_text) },
    );

    let analysis = ContentAnalysis::new(seo, readability, brand_voice);
    tracing::debug!(
        seo = analysis.seo.score,
        readability = analysis.readability.card.score,
        brand_voice = analysis.brand_voice.score,
        overall = analysis.overall,
        "Content analyzed"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok(analysis)))
}
