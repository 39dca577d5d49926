use std::sync::Arc;

use chrono::{DateTime, Utc};
use kanso_core::{AppError, AppResult};
use kanso_domain::{EntryId, HabitEntry, HabitId, UserId, validate_value};

use crate::ports::{EntryRepository, HabitRepository, StreakQueue};

/// Fields accepted when logging a new entry.
#[derive(Debug, Clone)]
pub struct NewEntryInput {
    pub id: Option<EntryId>,
    pub completion_date: DateTime<Utc>,
    pub value: f64,
    pub notes: Option<String>,
}

/// A patch payload for an existing entry. `notes = Some("")` clears the
/// note, mirroring the habit reminder_time convention.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub value: Option<f64>,
    pub notes: Option<String>,
    /// Client's last-known version; checked only when `> 0` (§4.3).
    pub version: Option<i64>,
}

/// Orchestrates entry create/update/delete/list/sync (§4.3). Every mutation
/// re-enqueues the parent habit for streak recomputation; the enqueue never
/// blocks or fails the request.
pub struct EntryService {
    entry_repository: Arc<dyn EntryRepository>,
    habit_repository: Arc<dyn HabitRepository>,
    streak_queue: Arc<dyn StreakQueue>,
}

impl EntryService {
    /// Creates an entry service over its three collaborators.
    #[must_use]
    pub fn new(
        entry_repository: Arc<dyn EntryRepository>,
        habit_repository: Arc<dyn HabitRepository>,
        streak_queue: Arc<dyn StreakQueue>,
    ) -> Self {
        Self {
            entry_repository,
            habit_repository,
            streak_queue,
        }
    }

    /// Logs a new entry against a habit, after a cross-aggregate owner check.
    pub async fn create(
        &self,
        user_id: UserId,
        habit_id: HabitId,
        input: NewEntryInput,
    ) -> AppResult<HabitEntry> {
        let habit = self
            .habit_repository
            .find_by_id_any_owner(habit_id)
            .await?
            .filter(|habit| habit.is_live())
            .ok_or_else(|| AppError::NotFound("habit not found".to_owned()))?;
        if habit.user_id != user_id {
            return Err(AppError::Forbidden("not the owner of this habit".to_owned()));
        }

        let value = validate_value(input.value)?;
        let now = Utc::now();
        let entry = HabitEntry {
            id: input.id.unwrap_or_default(),
            habit_id,
            user_id,
            completion_date: input.completion_date,
            value,
            notes: normalize_notes(input.notes.as_deref()),
            version: 1,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let saved = self.entry_repository.insert(entry).await?;
        self.enqueue_streak(habit_id);
        Ok(saved)
    }

    /// Updates an entry's value/notes with optimistic concurrency.
    pub async fn update(
        &self,
        user_id: UserId,
        entry_id: EntryId,
        patch: EntryPatch,
    ) -> AppResult<HabitEntry> {
        let existing = self
            .entry_repository
            .find_by_id_any_owner(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound("entry not found".to_owned()))?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden("not the owner of this entry".to_owned()));
        }

        if let Some(expected) = patch.version {
            if expected > 0 && expected != existing.version {
                return Err(AppError::Conflict("entry version mismatch".to_owned()));
            }
        }

        let value = match patch.value {
            Some(raw) => validate_value(raw)?,
            None => existing.value,
        };
        let notes = match &patch.notes {
            Some(raw) => normalize_notes(Some(raw.as_str())),
            None => existing.notes.clone(),
        };

        let expected_version = existing.version;
        let updated = HabitEntry {
            value,
            notes,
            version: existing.version + 1,
            updated_at: Utc::now(),
            ..existing
        };

        let saved = self.entry_repository.update(updated, expected_version).await?;
        self.enqueue_streak(saved.habit_id);
        Ok(saved)
    }

    /// Soft-deletes an entry. A genuinely absent entry is `NotFound`; an
    /// entry owned by a different user is `Forbidden` (§7).
    pub async fn delete(&self, user_id: UserId, entry_id: EntryId) -> AppResult<()> {
        let existing = self
            .entry_repository
            .find_by_id_any_owner(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound("entry not found".to_owned()))?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden("not the owner of this entry".to_owned()));
        }

        let deleted = self.entry_repository.soft_delete(existing.id).await?;
        self.enqueue_streak(deleted.habit_id);
        Ok(())
    }

    /// Lists live entries for a habit within an optional date range, after
    /// an owner check on the parent habit.
    pub async fn list_by_habit(
        &self,
        user_id: UserId,
        habit_id: HabitId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<HabitEntry>> {
        let habit = self
            .habit_repository
            .find_by_id_any_owner(habit_id)
            .await?
            .filter(|habit| habit.is_live())
            .ok_or_else(|| AppError::NotFound("habit not found".to_owned()))?;
        if habit.user_id != user_id {
            return Err(AppError::Forbidden("not the owner of this habit".to_owned()));
        }

        self.entry_repository
            .list_by_habit_range(user_id, habit_id, from, to)
            .await
    }

    /// Returns entries mutated after `cursor`, plus the next cursor to use.
    pub async fn get_delta(
        &self,
        user_id: UserId,
        cursor: DateTime<Utc>,
    ) -> AppResult<(Vec<HabitEntry>, DateTime<Utc>)> {
        let entries = self.entry_repository.get_delta(user_id, cursor).await?;
        let next_cursor = entries
            .iter()
            .map(|entry| entry.updated_at)
            .max()
            .unwrap_or(cursor);
        Ok((entries, next_cursor))
    }

    fn enqueue_streak(&self, habit_id: HabitId) {
        if !self.streak_queue.try_enqueue(habit_id) {
            tracing::warn!(habit_id = %habit_id, "streak queue full; dropping enqueue");
        }
    }
}

fn normalize_notes(raw: Option<&str>) -> Option<String> {
    match raw {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value.to_owned()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use kanso_domain::{FrequencyType, Habit, HabitType};

    use super::*;

    #[derive(Default)]
    struct InMemoryEntries {
        rows: Mutex<HashMap<EntryId, HabitEntry>>,
    }

    #[async_trait]
    impl EntryRepository for InMemoryEntries {
        async fn insert(&self, entry: HabitEntry) -> AppResult<HabitEntry> {
            self.rows.lock().expect("lock").insert(entry.id, entry.clone());
            Ok(entry)
        }

        async fn update(&self, entry: HabitEntry, expected_version: i64) -> AppResult<HabitEntry> {
            let mut rows = self.rows.lock().expect("lock");
            let stored = rows
                .get(&entry.id)
                .ok_or_else(|| AppError::NotFound("entry not found".to_owned()))?;
            if stored.version != expected_version {
                return Err(AppError::Conflict("version mismatch".to_owned()));
            }
            rows.insert(entry.id, entry.clone());
            Ok(entry)
        }

        async fn soft_delete(&self, entry_id: EntryId) -> AppResult<HabitEntry> {
            let mut rows = self.rows.lock().expect("lock");
            let entry = rows
                .get_mut(&entry_id)
                .ok_or_else(|| AppError::NotFound("entry not found".to_owned()))?;
            entry.deleted_at = Some(Utc::now());
            entry.version += 1;
            entry.updated_at = Utc::now();
            Ok(entry.clone())
        }

        async fn find_by_id(&self, user_id: UserId, entry_id: EntryId) -> AppResult<Option<HabitEntry>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .get(&entry_id)
                .filter(|entry| entry.user_id == user_id && entry.is_live())
                .cloned())
        }

        async fn find_by_id_any_owner(&self, entry_id: EntryId) -> AppResult<Option<HabitEntry>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .get(&entry_id)
                .filter(|entry| entry.is_live())
                .cloned())
        }

        async fn list_by_habit_range(
            &self,
            user_id: UserId,
            habit_id: HabitId,
            _from: Option<DateTime<Utc>>,
            _to: Option<DateTime<Utc>>,
        ) -> AppResult<Vec<HabitEntry>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .values()
                .filter(|entry| entry.user_id == user_id && entry.habit_id == habit_id && entry.is_live())
                .cloned()
                .collect())
        }

        async fn list_live_by_habit(&self, habit_id: HabitId) -> AppResult<Vec<HabitEntry>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .values()
                .filter(|entry| entry.habit_id == habit_id && entry.is_live())
                .cloned()
                .collect())
        }

        async fn get_delta(&self, user_id: UserId, cursor: DateTime<Utc>) -> AppResult<Vec<HabitEntry>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .values()
                .filter(|entry| entry.user_id == user_id && entry.updated_at > cursor)
                .cloned()
                .collect())
        }

        async fn list_by_habits_range(
            &self,
            user_id: UserId,
            habit_ids: &[HabitId],
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> AppResult<Vec<HabitEntry>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .values()
                .filter(|entry| entry.user_id == user_id && habit_ids.contains(&entry.habit_id))
                .cloned()
                .collect())
        }
    }

    struct SingleHabitRepository {
        habit: Habit,
    }

    #[async_trait]
    impl HabitRepository for SingleHabitRepository {
        async fn put(&self, _habit: Habit) -> AppResult<Habit> {
            unimplemented!("not exercised in these tests")
        }

        async fn update(&self, _habit: Habit, _expected_version: i64) -> AppResult<Habit> {
            unimplemented!("not exercised in these tests")
        }

        async fn soft_delete(&self, _habit_id: HabitId) -> AppResult<Habit> {
            unimplemented!("not exercised in these tests")
        }

        async fn find_by_id_any_owner(&self, habit_id: HabitId) -> AppResult<Option<Habit>> {
            Ok(Some(self.habit.clone()).filter(|habit| habit.id == habit_id))
        }

        async fn find_by_id(&self, _user_id: UserId, _habit_id: HabitId) -> AppResult<Option<Habit>> {
            unimplemented!("not exercised in these tests")
        }

        async fn list_live(&self, _user_id: UserId) -> AppResult<Vec<Habit>> {
            unimplemented!("not exercised in these tests")
        }

        async fn get_delta(&self, _user_id: UserId, _cursor: DateTime<Utc>) -> AppResult<Vec<Habit>> {
            unimplemented!("not exercised in these tests")
        }

        async fn update_streaks(
            &self,
            _habit_id: HabitId,
            _current_streak: i32,
            _longest_streak: i32,
        ) -> AppResult<Habit> {
            unimplemented!("not exercised in these tests")
        }
    }

    #[derive(Default)]
    struct CountingQueue {
        enqueued: AtomicUsize,
    }

    impl StreakQueue for CountingQueue {
        fn try_enqueue(&self, _habit_id: HabitId) -> bool {
            self.enqueued.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    fn sample_habit(user_id: UserId) -> Habit {
        let now = Utc::now();
        Habit {
            id: HabitId::new(),
            user_id,
            title: "Drink water".to_owned(),
            description: None,
            color: None,
            icon: None,
            sort_order: 0,
            habit_type: HabitType::Boolean,
            frequency_type: FrequencyType::Daily,
            weekdays: Vec::new(),
            interval: 1,
            reminder_time: None,
            unit: None,
            target_value: 1,
            start_date: now.date_naive(),
            end_date: None,
            archived_at: None,
            version: 1,
            deleted_at: None,
            created_at: now,
            updated_at: now,
            current_streak: 0,
            longest_streak: 0,
        }
    }

    fn service(habit: Habit) -> (EntryService, Arc<CountingQueue>) {
        let queue = Arc::new(CountingQueue::default());
        let service = EntryService::new(
            Arc::new(InMemoryEntries::default()),
            Arc::new(SingleHabitRepository { habit }),
            queue.clone(),
        );
        (service, queue)
    }

    #[tokio::test]
    async fn create_enqueues_streak_job() {
        let user_id = UserId::new();
        let habit = sample_habit(user_id);
        let habit_id = habit.id;
        let (service, queue) = service(habit);

        let entry = service
            .create(
                user_id,
                habit_id,
                NewEntryInput {
                    id: None,
                    completion_date: Utc::now(),
                    value: 1.0,
                    notes: None,
                },
            )
            .await
            .expect("should create");

        assert_eq!(entry.habit_id, habit_id);
        assert_eq!(queue.enqueued.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_against_foreign_habit_is_forbidden() {
        let owner = UserId::new();
        let habit = sample_habit(owner);
        let habit_id = habit.id;
        let (service, _queue) = service(habit);

        let result = service
            .create(
                UserId::new(),
                habit_id,
                NewEntryInput {
                    id: None,
                    completion_date: Utc::now(),
                    value: 1.0,
                    notes: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn update_with_stale_version_is_conflict() {
        let user_id = UserId::new();
        let habit = sample_habit(user_id);
        let habit_id = habit.id;
        let (service, _queue) = service(habit);

        let entry = service
            .create(
                user_id,
                habit_id,
                NewEntryInput {
                    id: None,
                    completion_date: Utc::now(),
                    value: 1.0,
                    notes: None,
                },
            )
            .await
            .expect("create");

        let result = service
            .update(
                user_id,
                entry.id,
                EntryPatch {
                    value: Some(2.0),
                    notes: None,
                    version: Some(99),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_by_different_owner_is_forbidden() {
        let user_id = UserId::new();
        let habit = sample_habit(user_id);
        let habit_id = habit.id;
        let (service, _queue) = service(habit);

        let entry = service
            .create(
                user_id,
                habit_id,
                NewEntryInput {
                    id: None,
                    completion_date: Utc::now(),
                    value: 1.0,
                    notes: None,
                },
            )
            .await
            .expect("create");

        let result = service
            .update(
                UserId::new(),
                entry.id,
                EntryPatch {
                    value: Some(2.0),
                    notes: None,
                    version: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn delete_by_different_owner_is_forbidden() {
        let user_id = UserId::new();
        let habit = sample_habit(user_id);
        let habit_id = habit.id;
        let (service, _queue) = service(habit);

        let entry = service
            .create(
                user_id,
                habit_id,
                NewEntryInput {
                    id: None,
                    completion_date: Utc::now(),
                    value: 1.0,
                    notes: None,
                },
            )
            .await
            .expect("create");

        let result = service.delete(UserId::new(), entry.id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn delete_missing_entry_is_not_found() {
        let user_id = UserId::new();
        let habit = sample_habit(user_id);
        let (service, _queue) = service(habit);

        let result = service.delete(user_id, EntryId::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
