use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use kanso_core::{AppError, AppResult};
use kanso_domain::{
    FrequencyType, Habit, HabitId, HabitType, UserId, validate_color, validate_description,
    validate_interval, validate_reminder_time, validate_target_value, validate_title,
    validate_weekdays,
};

use crate::ports::HabitRepository;

/// A create or patch payload for a habit. Every field is optional: on
/// create, an absent field takes its domain default; on update, an absent
/// field leaves the stored value untouched (§4.2's patch semantics).
///
/// `reminder_time = Some("")` clears the reminder; `archived = Some(false)`
/// is the only mutation an archived habit accepts besides delete.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub habit_type: Option<HabitType>,
    pub frequency_type: Option<FrequencyType>,
    pub weekdays: Option<Vec<u8>>,
    pub interval: Option<i32>,
    pub reminder_time: Option<String>,
    pub unit: Option<String>,
    pub target_value: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub archived: Option<bool>,
    /// Client's last-known version; checked only when `> 0` (§4.2).
    pub version: Option<i64>,
}

/// Orchestrates habit create/update/delete/list/sync (§4.2). Depends only on
/// the `HabitRepository` port, so the cache decorator (§4.4) is transparent
/// to this service.
pub struct HabitService {
    repository: Arc<dyn HabitRepository>,
}

impl HabitService {
    /// Creates a habit service over a repository (concrete or cache-decorated).
    #[must_use]
    pub fn new(repository: Arc<dyn HabitRepository>) -> Self {
        Self { repository }
    }

    /// Creates a habit. With a client-supplied id this is idempotent: a
    /// live habit with that id is returned unchanged; a tombstoned one is
    /// resurrected.
    pub async fn create(
        &self,
        user_id: UserId,
        habit_id: Option<HabitId>,
        patch: HabitPatch,
    ) -> AppResult<Habit> {
        let habit_id = habit_id.unwrap_or_default();

        if let Some(existing) = self.repository.find_by_id_any_owner(habit_id).await? {
            if existing.user_id != user_id {
                return Err(AppError::Conflict("habit id already in use".to_owned()));
            }
            if existing.is_live() {
                return Ok(existing);
            }
            let resurrected = merge(user_id, habit_id, Some(&existing), &patch)?;
            return self.repository.put(resurrected).await;
        }

        let habit = merge(user_id, habit_id, None, &patch)?;
        self.repository.put(habit).await
    }

    /// Updates a habit, upserting when it does not yet exist and a
    /// non-empty title is supplied (§4.2).
    pub async fn update(
        &self,
        user_id: UserId,
        habit_id: HabitId,
        patch: HabitPatch,
    ) -> AppResult<Habit> {
        let not_found = || AppError::NotFound("habit not found".to_owned());
        let existing = self.repository.find_by_id_any_owner(habit_id).await?;

        match existing {
            None => {
                let title_supplied = patch.title.as_deref().is_some_and(|t| !t.trim().is_empty());
                if !title_supplied {
                    return Err(not_found());
                }
                let habit = merge(user_id, habit_id, None, &patch)?;
                self.repository.put(habit).await
            }
            Some(existing) if existing.user_id != user_id || !existing.is_live() => Err(not_found()),
            Some(existing) => {
                if let Some(expected) = patch.version {
                    if expected > 0 && expected != existing.version {
                        return Err(AppError::Conflict("habit version mismatch".to_owned()));
                    }
                }
                if existing.is_archived() && patch.archived != Some(false) {
                    return Err(AppError::Conflict(
                        "archived habits only accept unarchive or delete".to_owned(),
                    ));
                }
                let expected_version = existing.version;
                let merged = merge(user_id, habit_id, Some(&existing), &patch)?;
                self.repository.update(merged, expected_version).await
            }
        }
    }

    /// Soft-deletes a habit after an owner check.
    pub async fn delete(&self, user_id: UserId, habit_id: HabitId) -> AppResult<()> {
        let existing = self
            .repository
            .find_by_id(user_id, habit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("habit not found".to_owned()))?;
        self.repository.soft_delete(existing.id).await?;
        Ok(())
    }

    /// Lists the user's live habits, ordered by the repository (sort_order
    /// ascending, then created_at descending).
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<Habit>> {
        self.repository.list_live(user_id).await
    }

    /// Returns habits mutated after `cursor`, plus the next cursor to use.
    pub async fn get_delta(
        &self,
        user_id: UserId,
        cursor: DateTime<Utc>,
    ) -> AppResult<(Vec<Habit>, DateTime<Utc>)> {
        let habits = self.repository.get_delta(user_id, cursor).await?;
        let next_cursor = habits.iter().map(|habit| habit.updated_at).max().unwrap_or(cursor);
        Ok((habits, next_cursor))
    }
}

/// Builds the full post-mutation `Habit` from an optional prior row and a
/// patch, applying domain validation to every field the patch touches.
fn merge(
    user_id: UserId,
    habit_id: HabitId,
    existing: Option<&Habit>,
    patch: &HabitPatch,
) -> AppResult<Habit> {
    let title = match (&patch.title, existing) {
        (Some(title), _) => validate_title(title)?,
        (None, Some(existing)) => existing.title.clone(),
        (None, None) => return Err(AppError::Validation("title is required".to_owned())),
    };

    let description = match &patch.description {
        Some(value) => validate_description(Some(value.as_str()))?,
        None => existing.and_then(|habit| habit.description.clone()),
    };

    let color = match &patch.color {
        Some(value) => validate_color(Some(value.as_str()))?,
        None => existing.and_then(|habit| habit.color.clone()),
    };

    let icon = patch
        .icon
        .clone()
        .or_else(|| existing.and_then(|habit| habit.icon.clone()));

    let sort_order = patch
        .sort_order
        .unwrap_or_else(|| existing.map_or(0, |habit| habit.sort_order));

    let habit_type = patch
        .habit_type
        .unwrap_or_else(|| existing.map_or_else(HabitType::default, |habit| habit.habit_type));

    let weekdays = match &patch.weekdays {
        Some(raw) => validate_weekdays(raw)?,
        None => existing.map(|habit| habit.weekdays.clone()).unwrap_or_default(),
    };

    let interval = match patch.interval {
        Some(raw) => validate_interval(raw)?,
        None => existing.map_or(1, |habit| habit.interval),
    };

    let frequency_type = patch.frequency_type.unwrap_or_else(|| match existing {
        Some(habit) => habit.frequency_type,
        None => FrequencyType::derive(&weekdays, interval),
    });

    let reminder_time = match &patch.reminder_time {
        Some(raw) if raw.is_empty() => None,
        Some(raw) => validate_reminder_time(Some(raw.as_str()))?,
        None => existing.and_then(|habit| habit.reminder_time.clone()),
    };

    let unit = patch
        .unit
        .clone()
        .or_else(|| existing.and_then(|habit| habit.unit.clone()));

    let target_value_raw = patch
        .target_value
        .unwrap_or_else(|| existing.map_or(1, |habit| habit.target_value));
    let target_value = validate_target_value(target_value_raw, habit_type)?;

    let start_date = patch
        .start_date
        .unwrap_or_else(|| existing.map_or_else(|| Utc::now().date_naive(), |habit| habit.start_date));
    let end_date = patch
        .end_date
        .or_else(|| existing.and_then(|habit| habit.end_date));

    let archived_at = match patch.archived {
        Some(true) => Some(existing.and_then(|habit| habit.archived_at).unwrap_or_else(Utc::now)),
        Some(false) => None,
        None => existing.and_then(|habit| habit.archived_at),
    };

    let now = Utc::now();
    let (version, created_at, current_streak, longest_streak) = match existing {
        Some(existing) => (
            existing.version + 1,
            existing.created_at,
            existing.current_streak,
            existing.longest_streak,
        ),
        None => (1, now, 0, 0),
    };

    Ok(Habit {
        id: habit_id,
        user_id,
        title,
        description,
        color,
        icon,
        sort_order,
        habit_type,
        frequency_type,
        weekdays,
        interval,
        reminder_time,
        unit,
        target_value,
        start_date,
        end_date,
        archived_at,
        version,
        deleted_at: None,
        created_at,
        updated_at: now,
        current_streak,
        longest_streak,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct InMemoryHabits {
        rows: Mutex<HashMap<HabitId, Habit>>,
    }

    #[async_trait]
    impl HabitRepository for InMemoryHabits {
        async fn put(&self, habit: Habit) -> AppResult<Habit> {
            self.rows.lock().expect("lock").insert(habit.id, habit.clone());
            Ok(habit)
        }

        async fn update(&self, habit: Habit, expected_version: i64) -> AppResult<Habit> {
            let mut rows = self.rows.lock().expect("lock");
            let stored = rows
                .get(&habit.id)
                .ok_or_else(|| AppError::NotFound("habit not found".to_owned()))?;
            if stored.version != expected_version {
                return Err(AppError::Conflict("version mismatch".to_owned()));
            }
            rows.insert(habit.id, habit.clone());
            Ok(habit)
        }

        async fn soft_delete(&self, habit_id: HabitId) -> AppResult<Habit> {
            let mut rows = self.rows.lock().expect("lock");
            let habit = rows
                .get_mut(&habit_id)
                .ok_or_else(|| AppError::NotFound("habit not found".to_owned()))?;
            habit.deleted_at = Some(Utc::now());
            habit.version += 1;
            habit.updated_at = Utc::now();
            Ok(habit.clone())
        }

        async fn find_by_id_any_owner(&self, habit_id: HabitId) -> AppResult<Option<Habit>> {
            Ok(self.rows.lock().expect("lock").get(&habit_id).cloned())
        }

        async fn find_by_id(&self, user_id: UserId, habit_id: HabitId) -> AppResult<Option<Habit>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .get(&habit_id)
                .filter(|habit| habit.user_id == user_id && habit.is_live())
                .cloned())
        }

        async fn list_live(&self, user_id: UserId) -> AppResult<Vec<Habit>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .values()
                .filter(|habit| habit.user_id == user_id && habit.is_live())
                .cloned()
                .collect())
        }

        async fn get_delta(&self, user_id: UserId, cursor: DateTime<Utc>) -> AppResult<Vec<Habit>> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .values()
                .filter(|habit| habit.user_id == user_id && habit.updated_at > cursor)
                .cloned()
                .collect())
        }

        async fn update_streaks(
            &self,
            habit_id: HabitId,
            current_streak: i32,
            longest_streak: i32,
        ) -> AppResult<Habit> {
            let mut rows = self.rows.lock().expect("lock");
            let habit = rows
                .get_mut(&habit_id)
                .ok_or_else(|| AppError::NotFound("habit not found".to_owned()))?;
            habit.current_streak = current_streak;
            habit.longest_streak = longest_streak;
            habit.updated_at = Utc::now();
            Ok(habit.clone())
        }
    }

    fn service() -> HabitService {
        HabitService::new(Arc::new(InMemoryHabits::default()))
    }

    fn patch_with_title(title: &str) -> HabitPatch {
        HabitPatch {
            title: Some(title.to_owned()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_defaults_to_boolean_daily() {
        let user_id = UserId::new();
        let habit = service()
            .create(user_id, None, patch_with_title("Drink water"))
            .await
            .expect("should create");
        assert_eq!(habit.habit_type, HabitType::Boolean);
        assert_eq!(habit.frequency_type, FrequencyType::Daily);
        assert_eq!(habit.version, 1);
        assert_eq!(habit.target_value, 1);
    }

    #[tokio::test]
    async fn create_with_same_id_is_idempotent() {
        let service = service();
        let user_id = UserId::new();
        let habit_id = HabitId::new();
        let first = service
            .create(user_id, Some(habit_id), patch_with_title("Read"))
            .await
            .expect("first create");
        let second = service
            .create(user_id, Some(habit_id), patch_with_title("Read, edited"))
            .await
            .expect("second create");
        assert_eq!(first.title, second.title);
        assert_eq!(second.version, 1);
    }

    #[tokio::test]
    async fn create_resurrects_tombstoned_habit() {
        let service = service();
        let user_id = UserId::new();
        let habit_id = HabitId::new();
        service
            .create(user_id, Some(habit_id), patch_with_title("Read"))
            .await
            .expect("first create");
        service.delete(user_id, habit_id).await.expect("delete");

        let resurrected = service
            .create(user_id, Some(habit_id), patch_with_title("Read again"))
            .await
            .expect("resurrect");
        assert!(resurrected.is_live());
        assert_eq!(resurrected.version, 2);
        assert_eq!(resurrected.title, "Read again");
    }

    #[tokio::test]
    async fn update_missing_habit_with_title_upserts() {
        let service = service();
        let user_id = UserId::new();
        let habit_id = HabitId::new();
        let habit = service
            .update(user_id, habit_id, patch_with_title("New via upsert"))
            .await
            .expect("should upsert");
        assert_eq!(habit.id, habit_id);
    }

    #[tokio::test]
    async fn update_missing_habit_without_title_is_not_found() {
        let result = service().update(UserId::new(), HabitId::new(), HabitPatch::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_by_different_owner_is_not_found() {
        let service = service();
        let owner = UserId::new();
        let habit_id = HabitId::new();
        service
            .create(owner, Some(habit_id), patch_with_title("Mine"))
            .await
            .expect("create");

        let result = service
            .update(UserId::new(), habit_id, patch_with_title("Stolen"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_with_stale_version_is_conflict() {
        let service = service();
        let user_id = UserId::new();
        let habit_id = HabitId::new();
        service
            .create(user_id, Some(habit_id), patch_with_title("Mine"))
            .await
            .expect("create");

        let result = service
            .update(
                user_id,
                habit_id,
                HabitPatch {
                    version: Some(99),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn archived_habit_rejects_mutation_other_than_unarchive() {
        let service = service();
        let user_id = UserId::new();
        let habit_id = HabitId::new();
        service
            .create(user_id, Some(habit_id), patch_with_title("Mine"))
            .await
            .expect("create");
        service
            .update(
                user_id,
                habit_id,
                HabitPatch {
                    archived: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("archive");

        let result = service.update(user_id, habit_id, patch_with_title("Edited")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let unarchived = service
            .update(
                user_id,
                habit_id,
                HabitPatch {
                    archived: Some(false),
                    ..Default::default()
                },
            )
            .await
            .expect("unarchive should succeed");
        assert!(!unarchived.is_archived());
    }

    #[tokio::test]
    async fn delta_reflects_only_entries_after_cursor() {
        let service = service();
        let user_id = UserId::new();
        let before = Utc::now();
        service
            .create(user_id, None, patch_with_title("Later habit"))
            .await
            .expect("create");

        let (changes, next_cursor) = service.get_delta(user_id, before).await.expect("delta");
        assert_eq!(changes.len(), 1);
        assert!(next_cursor >= before);
    }
}
