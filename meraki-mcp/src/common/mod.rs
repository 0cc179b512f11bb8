//! Common utilities shared across the library

/// Environment variable loading helpers
pub mod env_loader;

/// Token bucket request pacing
pub mod rate_limiter;

pub use env_loader::EnvLoader;
pub use rate_limiter::{RateLimiter, RateLimiterConfig};
