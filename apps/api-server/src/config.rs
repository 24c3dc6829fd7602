//! Application configuration loaded from environment variables.

use std::env;

use uuid::Uuid;

use quill_infra::{DatabaseConfig, JwtConfig};

#[cfg(feature = "rate-limit")]
use quill_infra::RateLimitConfig;

/// The single admin account, configured rather than stored.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl AdminCredentials {
    fn from_env() -> Option<Self> {
        let email = env::var("ADMIN_EMAIL").ok()?;
        let password_hash = env::var("ADMIN_PASSWORD_HASH").ok()?;
        let id = env::var("ADMIN_ID")
            .ok()
            .and_then(|s| Uuid::parse_str(&s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Some(Self {
            id,
            email,
            password_hash,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub admin: Option<AdminCredentials>,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: Option<RateLimitConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = env::var("DB_MAX_CONNECTIONS").ok().and_then(|s| s.parse().ok()) {
                config.max_connections = max;
            }
            if let Some(min) = env::var("DB_MIN_CONNECTIONS").ok().and_then(|s| s.parse().ok()) {
                config.min_connections = min;
            }
            config
        });

        let admin = AdminCredentials::from_env();
        if admin.is_none() {
            tracing::warn!("ADMIN_EMAIL / ADMIN_PASSWORD_HASH not set. Admin login is disabled.");
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            admin,
            #[cfg(feature = "rate-limit")]
            rate_limit: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true)
                .then(RateLimitConfig::from_env),
        }
    }
}
