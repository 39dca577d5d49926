//! Request/response payloads for the HTTP boundary. Domain types
//! (`Habit`, `HabitEntry`) already derive `Serialize`/`Deserialize` and are
//! returned as-is where their shape matches the wire contract; these types
//! cover everything else — patch semantics, auth payloads, and aggregates
//! the domain crate has no reason to know how to serialize.

mod auth;
mod entry;
mod habit;
mod stats;

pub use auth::{
    DeleteAccountResponse, LoginRequest, LoginResponse, RegisterRequest, UserResponse,
    ValidateResponse,
};
pub use entry::{EntryCreateRequest, EntryPatchRequest, EntryQuery, EntrySyncQuery};
pub use habit::{HabitPatchRequest, HabitSyncQuery};
pub use stats::{StatsQuery, WeeklyStatsResponse};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Delta-sync response envelope shared by `/habits/sync` and `/entries/sync`.
#[derive(Debug, Serialize)]
pub struct SyncResponse<T> {
    pub changes: Vec<T>,
    pub timestamp: DateTime<Utc>,
}

/// `/health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
