//! Request rate limiting.

mod memory;

pub use memory::{InMemoryRateLimiter, RateLimitConfig};
