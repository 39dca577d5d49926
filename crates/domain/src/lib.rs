//! Domain entities and invariants for the habit sync engine.

#![forbid(unsafe_code)]

mod habit;
mod habit_entry;
mod streak;
mod user;

pub use habit::{
    FrequencyType, Habit, HabitId, HabitType, validate_color, validate_description,
    validate_interval, validate_reminder_time, validate_target_value, validate_title,
    validate_weekdays,
};
pub use habit_entry::{EntryId, HabitEntry, validate_value};
pub use streak::compute_streaks;
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, UserId, validate_password,
};
