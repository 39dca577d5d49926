//! Fixed-window rate limiting, fail-open on backend errors (§4.5).

mod config;
mod ports;
mod service;

pub use config::RateLimitRule;
pub use ports::{AttemptInfo, RateLimitRepository};
pub use service::{RateLimitDecision, RateLimitService};
