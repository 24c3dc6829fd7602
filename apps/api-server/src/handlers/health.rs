//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::ports::Clock;
use quill_shared::ApiResponse;

use crate::observability::RequestId;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `connected`, `unreachable`, or `in_memory`.
    pub content_store: &'static str,
    pub timestamp: String,
    pub request_id: String,
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let content_store = match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                "unreachable"
            }
        },
        None => "in_memory",
    };

    let response = HealthResponse {
        status: if content_store == "unreachable" { "degraded" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        content_store,
        timestamp: state.clock.now().to_rfc3339(),
        request_id: request_id.as_str().to_string(),
    };

    HttpResponse::Ok().json(ApiResponse::ok(response))
}
