//! Shared primitives for all Rust crates in the sync engine.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across the sync engine's crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories, mapped to HTTP status codes at the
/// edge and never matched on by string.
#[derive(Debug, Error)]
pub enum AppError {
    /// Schema or semantic validation failure (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist, or is hidden from this caller (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing/invalid credentials, or a token that fails liveness (401).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated but not the owner of the target resource (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Rate limit exceeded; caller should retry after the given delay (429).
    #[error("rate limited, retry in {retry_in_s}s")]
    RateLimited {
        /// Seconds the caller should wait before retrying.
        retry_in_s: u64,
    },

    /// Unclassified repository, cache, or infrastructure failure (500).
    #[error("internal error: {0}")]
    Internal(String),
}
