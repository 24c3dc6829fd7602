//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod rate_limit;
mod repository;
mod social;

pub use auth::{ADMIN_ROLE, AuthError, PasswordService, TokenClaims, TokenService};
pub use clock::{Clock, FixedClock, SystemClock};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{BaseRepository, PostRepository, listing_order};
pub use social::{PublishReceipt, SocialError, SocialPublisher};
