use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, Utc};
use kanso_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserId;

/// Identity of a tracked habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(Uuid);

impl HabitId {
    /// Creates a random habit id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID as a habit id.
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

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for HabitId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// The kind of value a habit's entries carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitType {
    /// Done-or-not. Entries always carry `value = 1`.
    Boolean,
    /// A numeric quantity logged against `target_value`.
    Numeric,
    /// A duration, treated like `Numeric` but presented as elapsed time.
    Timer,
}

impl HabitType {
    /// Returns the wire representation used in JSON and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Numeric => "numeric",
            Self::Timer => "timer",
        }
    }

    /// Parses the wire representation, defaulting unknown/absent values is
    /// the caller's responsibility — this only accepts the three known
    /// spellings.
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "boolean" => Ok(Self::Boolean),
            "numeric" => Ok(Self::Numeric),
            "timer" => Ok(Self::Timer),
            other => Err(AppError::Validation(format!(
                "unknown habit type '{other}'"
            ))),
        }
    }
}

impl Default for HabitType {
    fn default() -> Self {
        Self::Boolean
    }
}

/// How often a habit is scheduled to recur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyType {
    /// Every day.
    Daily,
    /// A fixed subset of weekdays.
    SpecificDays,
    /// Every N days.
    Interval,
}

impl FrequencyType {
    /// Returns the wire representation used in JSON and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::SpecificDays => "specific_days",
            Self::Interval => "interval",
        }
    }

    /// Parses the wire representation.
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "daily" => Ok(Self::Daily),
            "specific_days" => Ok(Self::SpecificDays),
            "interval" => Ok(Self::Interval),
            other => Err(AppError::Validation(format!(
                "unknown frequency type '{other}'"
            ))),
        }
    }

    /// Derives the frequency type from scheduling fields when the caller did
    /// not supply one explicitly: explicit `weekdays` wins, then
    /// `interval > 1`, else `daily`.
    #[must_use]
    pub fn derive(weekdays: &[u8], interval: i32) -> Self {
        if !weekdays.is_empty() {
            Self::SpecificDays
        } else if interval > 1 {
            Self::Interval
        } else {
            Self::Daily
        }
    }
}

/// A user-defined tracked behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Stable identity, may be client-supplied at creation.
    pub id: HabitId,
    /// Owning user; immutable after creation.
    pub user_id: UserId,
    /// Display title, 1-100 trimmed characters.
    pub title: String,
    /// Optional free-text description, at most 500 characters.
    pub description: Option<String>,
    /// Optional display color, `#RGB` or `#RRGGBB`.
    pub color: Option<String>,
    /// Optional icon identifier, opaque to the domain.
    pub icon: Option<String>,
    /// Position among the user's habits for list ordering.
    pub sort_order: i32,
    /// What kind of value entries for this habit carry.
    pub habit_type: HabitType,
    /// How often the habit recurs.
    pub frequency_type: FrequencyType,
    /// Days of week (0=Sunday..6=Saturday) the habit is scheduled on, when
    /// `frequency_type == SpecificDays`. Sorted ascending, deduplicated.
    pub weekdays: Vec<u8>,
    /// Recurrence interval in days, when `frequency_type == Interval`.
    pub interval: i32,
    /// Optional `HH:MM` 24-hour reminder time.
    pub reminder_time: Option<String>,
    /// Unit label for numeric/timer habits (e.g. "ml", "min").
    pub unit: Option<String>,
    /// Target value per completion day; forced to 1 for boolean habits.
    pub target_value: i32,
    /// Date the habit's schedule starts from.
    pub start_date: NaiveDate,
    /// Optional date the habit's schedule ends.
    pub end_date: Option<NaiveDate>,
    /// Timestamp the habit was archived at, if archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency version, starts at 1, increments on mutation.
    pub version: i64,
    /// Tombstone timestamp; `Some` means soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant of the most recent mutation (including soft-delete).
    pub updated_at: DateTime<Utc>,
    /// Consecutive-day streak as of the most recent worker recomputation.
    pub current_streak: i32,
    /// Longest consecutive-day streak ever observed.
    pub longest_streak: i32,
}

impl Habit {
    /// A habit is live when it has not been soft-deleted.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// A habit is archived when `archived_at` is set.
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

/// Validates and normalizes a habit title: trimmed, 1-100 characters.
pub fn validate_title(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_owned()));
    }
    if trimmed.chars().count() > 100 {
        return Err(AppError::Validation(
            "title must be at most 100 characters".to_owned(),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Validates an optional description: at most 500 characters.
pub fn validate_description(raw: Option<&str>) -> AppResult<Option<String>> {
    match raw {
        None => Ok(None),
        Some(value) => {
            if value.chars().count() > 500 {
                return Err(AppError::Validation(
                    "description must be at most 500 characters".to_owned(),
                ));
            }
            Ok(Some(value.to_owned()))
        }
    }
}

/// Validates an optional hex color: `#RGB` or `#RRGGBB`.
pub fn validate_color(raw: Option<&str>) -> AppResult<Option<String>> {
    let Some(value) = raw else {
        return Ok(None);
    };

    let is_hex_digit = |c: char| c.is_ascii_hexdigit();
    let body = value.strip_prefix('#').ok_or_else(|| {
        AppError::Validation("color must start with '#'".to_owned())
    })?;
    let valid_length = body.len() == 3 || body.len() == 6;
    if !valid_length || !body.chars().all(is_hex_digit) {
        return Err(AppError::Validation(
            "color must be a '#RGB' or '#RRGGBB' hex value".to_owned(),
        ));
    }

    Ok(Some(value.to_owned()))
}

/// Normalizes weekdays: validates range 0..=6, sorts ascending, dedupes.
pub fn validate_weekdays(raw: &[u8]) -> AppResult<Vec<u8>> {
    for &day in raw {
        if day > 6 {
            return Err(AppError::Validation(format!(
                "weekday {day} is out of range 0..=6"
            )));
        }
    }
    let mut normalized = raw.to_vec();
    normalized.sort_unstable();
    normalized.dedup();
    Ok(normalized)
}

/// Validates the recurrence interval: must be at least 1.
pub fn validate_interval(raw: i32) -> AppResult<i32> {
    if raw < 1 {
        return Err(AppError::Validation(
            "interval must be at least 1".to_owned(),
        ));
    }
    Ok(raw)
}

/// Validates an optional `HH:MM` 24-hour reminder time.
pub fn validate_reminder_time(raw: Option<&str>) -> AppResult<Option<String>> {
    let Some(value) = raw else {
        return Ok(None);
    };

    let invalid = || AppError::Validation("reminder_time must be 'HH:MM' in 24h format".to_owned());

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(Some(value.to_owned()))
}

/// Validates the target value, forcing it to 1 for boolean habits.
pub fn validate_target_value(raw: i32, habit_type: HabitType) -> AppResult<i32> {
    if habit_type == HabitType::Boolean {
        return Ok(1);
    }
    if raw < 1 {
        return Err(AppError::Validation(
            "target_value must be at least 1".to_owned(),
        ));
    }
    Ok(raw)
}
