use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kanso_core::AppResult;

/// The result of atomically recording one attempt against a rate-limit key.
#[derive(Debug, Clone, Copy)]
pub struct AttemptInfo {
    /// Number of attempts recorded in the current window, including this one.
    pub attempt_count: i32,
    /// Instant the current window started, used to derive the reset time.
    pub window_started_at: DateTime<Utc>,
}

/// Repository port for the fixed-window rate-limit counter.
#[async_trait]
pub trait RateLimitRepository: Send + Sync {
    /// Atomically increments the counter for `key` and returns its state,
    /// setting the window's TTL on first use.
    async fn record_attempt(&self, key: &str, window_duration_seconds: i64) -> AppResult<AttemptInfo>;

    /// Best-effort cleanup of expired counters; a no-op for backends that
    /// expire keys natively (e.g. Redis TTL).
    async fn cleanup_expired(&self, before: DateTime<Utc>) -> AppResult<u64>;
}
