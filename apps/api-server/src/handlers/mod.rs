//! HTTP handlers and route configuration.

mod admin;
mod admin_posts;
mod analysis;
mod auth;
mod health;
mod posts;
mod social;
mod test_data;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use quill_core::ports::RateLimiter;
use quill_shared::ApiResponse;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Register extractor error handlers and every route.
pub fn configure_app(cfg: &mut web::ServiceConfig, limiter: Option<Arc<dyn RateLimiter>>) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );

    configure_routes(cfg, limiter);
}

fn configure_routes(cfg: &mut web::ServiceConfig, limiter: Option<Arc<dyn RateLimiter>>) {
    cfg.route("/admin", web::get().to(admin::entry))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                // Public listing
                .service(
                    web::scope("/posts")
                        .wrap(RateLimitMiddleware::new(limiter))
                        .route("", web::get().to(posts::list))
                        .route("/{slug}", web::get().to(posts::get_by_slug)),
                )
                .service(
                    web::scope("/admin")
                        .service(
                            web::scope("/posts")
                                .route("", web::get().to(admin_posts::list))
                                .route("", web::post().to(admin_posts::create))
                                .route("/{id}", web::get().to(admin_posts::get))
                                .route("/{id}", web::put().to(admin_posts::upsert))
                                .route("/{id}", web::delete().to(admin_posts::delete))
                                .route("/{id}/schedule", web::put().to(admin_posts::schedule)),
                        )
                        .route("/analysis", web::post().to(analysis::analyze))
                        .service(
                            web::scope("/test-data")
                                .route("", web::post().to(test_data::generate))
                                .route("", web::delete().to(test_data::cleanup))
                                .route("/visibility", web::get().to(test_data::visibility)),
                        ),
                )
                .service(
                    web::scope("/social")
                        .route("/platforms", web::get().to(social::platforms))
                        .route("/posts", web::post().to(social::publish)),
                ),
        );
}

/// Fallback for unmatched paths, so 404s carry the envelope too.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::failure(
        quill_shared::ErrorResponse::not_found("No route matches this path."),
    ))
}
