use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kanso_core::AppResult;
use kanso_domain::{EntryId, HabitEntry, HabitId, UserId};

/// Repository port for the `habit_entries` aggregate.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Inserts a new entry row.
    async fn insert(&self, entry: HabitEntry) -> AppResult<HabitEntry>;

    /// Replaces the row with `entry.id`, succeeding only if the currently
    /// stored `version` equals `expected_version`; otherwise `Conflict`.
    async fn update(&self, entry: HabitEntry, expected_version: i64) -> AppResult<HabitEntry>;

    /// Soft-deletes an entry by id.
    async fn soft_delete(&self, entry_id: EntryId) -> AppResult<HabitEntry>;

    /// Looks up a live entry scoped to its owner.
    async fn find_by_id(&self, user_id: UserId, entry_id: EntryId) -> AppResult<Option<HabitEntry>>;

    /// Looks up a live entry regardless of owner — used to distinguish
    /// "absent" from "owned by someone else" ahead of a `Forbidden` result.
    async fn find_by_id_any_owner(&self, entry_id: EntryId) -> AppResult<Option<HabitEntry>>;

    /// Lists live entries for a habit within an optional `completion_date`
    /// range, ordered by `completion_date DESC`.
    async fn list_by_habit_range(
        &self,
        user_id: UserId,
        habit_id: HabitId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<HabitEntry>>;

    /// Loads every live entry for a habit, with no user context — used by
    /// the streak worker, which only has a habit id.
    async fn list_live_by_habit(&self, habit_id: HabitId) -> AppResult<Vec<HabitEntry>>;

    /// Returns all entries (including tombstoned) owned by the user with
    /// `updated_at > cursor`, ordered by `updated_at ASC`.
    async fn get_delta(&self, user_id: UserId, cursor: DateTime<Utc>) -> AppResult<Vec<HabitEntry>>;

    /// Loads live entries across the given habits within a completion-date
    /// range, for the stats service's bucketing pass.
    async fn list_by_habits_range(
        &self,
        user_id: UserId,
        habit_ids: &[HabitId],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<HabitEntry>>;
}
