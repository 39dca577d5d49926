use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kanso_core::AppResult;
use kanso_domain::{Habit, HabitId, UserId};

/// Repository port for the `habits` aggregate. The cache tier (§4.4) is a
/// decorator implementing this same trait, so services depend on the
/// capability set rather than a concrete backend.
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Inserts a brand-new row, or fully overwrites an existing row by id —
    /// the single primitive behind both idempotent create and tombstone
    /// resurrection (§4.2). Does not check `expected_version`.
    async fn put(&self, habit: Habit) -> AppResult<Habit>;

    /// Replaces the row with `habit.id`, succeeding only if the currently
    /// stored `version` equals `expected_version`; otherwise `Conflict`.
    async fn update(&self, habit: Habit, expected_version: i64) -> AppResult<Habit>;

    /// Soft-deletes a habit by id: sets `deleted_at`, increments `version`,
    /// refreshes `updated_at`.
    async fn soft_delete(&self, habit_id: HabitId) -> AppResult<Habit>;

    /// Looks up a habit (live or tombstoned) regardless of owner — used to
    /// distinguish "absent" from "owned by someone else".
    async fn find_by_id_any_owner(&self, habit_id: HabitId) -> AppResult<Option<Habit>>;

    /// Looks up a live habit scoped to its owner.
    async fn find_by_id(&self, user_id: UserId, habit_id: HabitId) -> AppResult<Option<Habit>>;

    /// Lists live habits for a user, ordered by `(sort_order ASC, created_at
    /// DESC)`.
    async fn list_live(&self, user_id: UserId) -> AppResult<Vec<Habit>>;

    /// Returns all habits (including tombstoned) owned by the user with
    /// `updated_at > cursor`.
    async fn get_delta(&self, user_id: UserId, cursor: DateTime<Utc>) -> AppResult<Vec<Habit>>;

    /// Updates the derived streak fields for a habit by id; called by the
    /// streak worker, which has no user context.
    async fn update_streaks(
        &self,
        habit_id: HabitId,
        current_streak: i32,
        longest_streak: i32,
    ) -> AppResult<Habit>;
}
