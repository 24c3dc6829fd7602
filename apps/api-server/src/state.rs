//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    Clock, PasswordService, PostRepository, RateLimiter, SocialPublisher, SystemClock,
    TokenService,
};
use quill_infra::{
    Argon2PasswordService, DatabaseConnections, DryRunSocialPublisher, InMemoryPostRepository,
    JwtTokenService,
};

#[cfg(feature = "postgres")]
use quill_infra::PostgresPostRepository;

#[cfg(feature = "rate-limit")]
use quill_infra::InMemoryRateLimiter;

use crate::config::{AdminCredentials, AppConfig};

/// Shared application state. Every service is injected behind its port.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub clock: Arc<dyn Clock>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub social: Arc<dyn SocialPublisher>,
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub admin: Option<AdminCredentials>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (db, posts): (Option<Arc<DatabaseConnections>>, Arc<dyn PostRepository>) = {
            if let Some(db_config) = config.database.as_ref() {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let repo: Arc<dyn PostRepository> =
                            Arc::new(PostgresPostRepository::new(conn.main.clone()));
                        (Some(conn), repo)
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Failed to connect to database. Using in-memory content store."
                        );
                        (None, Arc::new(InMemoryPostRepository::new()))
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory content store.");
                (None, Arc::new(InMemoryPostRepository::new()))
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, posts): (Option<Arc<DatabaseConnections>>, Arc<dyn PostRepository>) = {
            tracing::info!("Running without postgres feature - using in-memory content store");
            (None, Arc::new(InMemoryPostRepository::new()))
        };

        #[cfg(feature = "rate-limit")]
        let rate_limiter = config
            .rate_limit
            .clone()
            .map(|c| Arc::new(InMemoryRateLimiter::new(c)) as Arc<dyn RateLimiter>);

        #[cfg(not(feature = "rate-limit"))]
        let rate_limiter = None;

        tracing::info!(
            database = db.is_some(),
            rate_limit = rate_limiter.is_some(),
            admin_login = config.admin.is_some(),
            "Application state initialized"
        );

        Self {
            posts,
            clock: Arc::new(SystemClock),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            social: Arc::new(DryRunSocialPublisher::new()),
            rate_limiter,
            admin: config.admin.clone(),
            db,
        }
    }

    /// State over an in-memory store with a caller-driven clock.
    #[cfg(test)]
    pub fn in_memory(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            clock,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            social: Arc::new(DryRunSocialPublisher::new()),
            rate_limiter: None,
            admin: config.admin.clone(),
            db: None,
        }
    }
}
