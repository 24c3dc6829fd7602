//! # Quill API Server
//!
//! Actix-web server for the blog backend: public listing, admin authoring,
//! content scoring, test-data tooling and social post submission.

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(host = %config.host, port = config.port, "Starting Quill API server");

    let state = AppState::new(&config).await;

    HttpServer::new(move || {
        let limiter = state.rate_limiter.clone();
        App::new()
            .wrap(from_fn(observability::propagate_request_id))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| handlers::configure_app(cfg, limiter))
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
