//! Client-side request pacing for the Dashboard API
//!
//! The Dashboard enforces a per-organization request budget and answers 429
//! once it is exhausted. Pacing requests locally with a token bucket per
//! scope keeps bursts of tool calls under that budget.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Dashboard API budget per organization (requests per second)
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;

/// Idle time after which a bucket is forgotten by [`RateLimiter::cleanup_idle`]
const IDLE_BUCKET_TTL: Duration = Duration::from_secs(300);

/// Scope count above which idle buckets are dropped on the next acquire
const MAX_TRACKED_SCOPES: usize = 1024;

/// Configuration for rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Sustained requests per second allowed for one scope
    pub requests_per_second: u32,
    /// Tokens a fresh or idle bucket starts with
    pub burst: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::per_second(DEFAULT_REQUESTS_PER_SECOND)
    }
}

impl RateLimiterConfig {
    /// Budget of `n` requests per second with an equal burst size
    pub fn per_second(n: u32) -> Self {
        let n = n.max(1);
        Self {
            requests_per_second: n,
            burst: n,
        }
    }
}

/// Token bucket for rate limiting
#[derive(Debug, Clone)]
struct TokenBucket {
    capacity: f64,
    tokens: f64,
    last_refill: Instant,
    /// Tokens added per second
    refill_rate: f64,
}

impl TokenBucket {
    fn new(config: &RateLimiterConfig) -> Self {
        let capacity = f64::from(config.burst.max(1));
        Self {
            capacity,
            tokens: capacity,
            last_refill: Instant::now(),
            refill_rate: f64::from(config.requests_per_second.max(1)),
        }
    }

    fn try_consume(&mut self) -> bool {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();

        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
            self.last_refill = now;
        }
    }

    fn time_until_token(&mut self) -> Duration {
        self.refill();

        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.refill_rate)
        }
    }
}

/// Token bucket rate limiter keyed by request scope
///
/// Keys are free-form scope strings such as `organization:123` or
/// `network:N_1`. Each key owns an independent bucket.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with default configuration
    pub fn new() -> Self {
        Self::with_config(RateLimiterConfig::default())
    }

    /// Create a new rate limiter with custom configuration
    pub fn with_config(config: RateLimiterConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// Take a token for `key` if one is available
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the request may proceed now
    /// * `Err(wait)` with the time until the next token otherwise
    pub fn try_acquire(&self, key: &str) -> Result<(), Duration> {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(&self.config));

        if bucket.try_consume() {
            Ok(())
        } else {
            Err(bucket.time_until_token())
        }
    }

    /// Wait until a token for `key` is available, then take it
    pub async fn acquire(&self, key: &str) {
        if self.buckets.len() > MAX_TRACKED_SCOPES {
            self.cleanup_idle();
        }
        loop {
            // The map guard is released before sleeping
            let wait = match self.try_acquire(key) {
                Ok(()) => return,
                Err(wait) => wait,
            };
            tracing::debug!("Pacing request for '{}' by {}ms", key, wait.as_millis());
            tokio::time::sleep(wait.max(Duration::from_millis(1))).await;
        }
    }

    /// Number of scopes currently tracked
    pub fn tracked_scopes(&self) -> usize {
        self.buckets.len()
    }

    /// Forget buckets that have been idle long enough to be full again
    pub fn cleanup_idle(&self) {
        let now = Instant::now();
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.last_refill) < IDLE_BUCKET_TTL);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
