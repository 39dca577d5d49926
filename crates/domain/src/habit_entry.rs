use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use kanso_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::habit::HabitId;
use crate::user::UserId;

/// Identity of a single logged completion/value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Creates a random entry id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID as an entry id.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EntryId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A single logged completion or value for a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitEntry {
    /// Stable identity, may be client-supplied at creation.
    pub id: EntryId,
    /// The habit this entry belongs to.
    pub habit_id: HabitId,
    /// Denormalized owner, must equal the parent habit's owner at creation.
    pub user_id: UserId,
    /// The UTC instant this completion/value applies to.
    pub completion_date: DateTime<Utc>,
    /// Logged value; `1.0` for boolean habits, an arbitrary non-negative
    /// quantity for numeric/timer habits.
    pub value: f64,
    /// Optional free-text note.
    pub notes: Option<String>,
    /// Optimistic-concurrency version, starts at 1, increments on mutation.
    pub version: i64,
    /// Tombstone timestamp; `Some` means soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant of the most recent mutation (including soft-delete).
    pub updated_at: DateTime<Utc>,
}

impl HabitEntry {
    /// An entry is live when it has not been soft-deleted.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Validates a logged value: must be non-negative and finite.
pub fn validate_value(raw: f64) -> AppResult<f64> {
    if !raw.is_finite() {
        return Err(AppError::Validation("value must be finite".to_owned()));
    }
    if raw < 0.0 {
        return Err(AppError::Validation(
            "value must be greater than or equal to 0".to_owned(),
        ));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_rejects_negative() {
        assert!(validate_value(-1.0).is_err());
    }

    #[test]
    fn value_accepts_zero() {
        assert!(validate_value(0.0).is_ok());
    }

    #[test]
    fn value_rejects_nan() {
        assert!(validate_value(f64::NAN).is_err());
    }

    #[test]
    fn entry_id_formats_as_uuid() {
        let entry_id = EntryId::new();
        assert_eq!(entry_id.to_string().len(), 36);
    }
}
