/// A fixed-window rate-limit rule: at most `max_attempts` per
/// `window_seconds`, keyed by client IP.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitRule {
    /// Maximum attempts permitted within the window.
    pub max_attempts: i32,
    /// Window length in seconds.
    pub window_seconds: i64,
}

impl RateLimitRule {
    /// Creates a rate-limit rule.
    #[must_use]
    pub fn new(max_attempts: i32, window_seconds: i64) -> Self {
        Self {
            max_attempts,
            window_seconds,
        }
    }
}
