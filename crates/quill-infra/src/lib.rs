//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory content store, no database
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `rate-limit` - Rate limiting via governor

pub mod auth;
pub mod content;
pub mod database;
pub mod social;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use content::{HttpPostRepository, HttpStoreConfig, InMemoryPostRepository};
pub use database::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;
pub use social::DryRunSocialPublisher;

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
