use std::sync::Arc;

use chrono::Utc;

use super::config::RateLimitRule;
use super::ports::RateLimitRepository;

/// Outcome of a rate-limit check, carrying everything the HTTP edge needs to
/// set `X-RateLimit-*` headers and, on rejection, `Retry-After`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    /// Whether the request is permitted.
    pub allowed: bool,
    /// The rule's configured limit.
    pub limit: i32,
    /// Attempts remaining in the current window; never negative.
    pub remaining: i32,
    /// Seconds until the window resets.
    pub reset_in_s: i64,
}

/// Fixed-window rate limiter (§4.5). Fail-open: any repository error is
/// logged and treated as "permit the request" rather than propagated,
/// because an unavailable rate-limit backend must never itself become a
/// denial-of-service vector.
pub struct RateLimitService {
    repository: Arc<dyn RateLimitRepository>,
    rule: RateLimitRule,
}

impl RateLimitService {
    /// Creates a rate limit service enforcing a single global rule.
    #[must_use]
    pub fn new(repository: Arc<dyn RateLimitRepository>, rule: RateLimitRule) -> Self {
        Self { repository, rule }
    }

    /// Records an attempt for `client_ip` and decides whether to permit it.
    pub async fn check_rate_limit(&self, client_ip: &str) -> RateLimitDecision {
        let key = format!("rate_limit:{client_ip}");

        match self
            .repository
            .record_attempt(&key, self.rule.window_seconds)
            .await
        {
            Ok(attempt) => {
                let elapsed = (Utc::now() - attempt.window_started_at).num_seconds().max(0);
                let reset_in_s = (self.rule.window_seconds - elapsed).max(0);
                let remaining = (self.rule.max_attempts - attempt.attempt_count).max(0);
                RateLimitDecision {
                    allowed: attempt.attempt_count <= self.rule.max_attempts,
                    limit: self.rule.max_attempts,
                    remaining,
                    reset_in_s,
                }
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    client_ip,
                    "rate limiter backend failed; failing open"
                );
                RateLimitDecision {
                    allowed: true,
                    limit: self.rule.max_attempts,
                    remaining: self.rule.max_attempts,
                    reset_in_s: self.rule.window_seconds,
                }
            }
        }
    }

    /// Best-effort cleanup of expired counters.
    pub async fn cleanup(&self) {
        if let Err(error) = self.repository.cleanup_expired(Utc::now()).await {
            tracing::warn!(error = %error, "rate limit cleanup failed");
        }
    }
}
