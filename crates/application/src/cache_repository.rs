use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kanso_core::AppResult;
use kanso_domain::{Habit, HabitId, UserId};

use crate::ports::{HabitListCache, HabitRepository};

/// Read-through / write-invalidate decorator over a `HabitRepository`
/// (§4.4). Implements the same port it wraps, so services are unaware
/// whether they hold this decorator or a bare repository.
///
/// Cache failures never surface as errors: a miss, an unparseable value, or
/// a backend error on `get`/`set`/`invalidate` is logged and the call falls
/// through to (or past) the backing repository.
pub struct CachingHabitRepository {
    inner: Arc<dyn HabitRepository>,
    cache: Arc<dyn HabitListCache>,
}

impl CachingHabitRepository {
    /// Wraps a backing repository with a habit-list cache.
    #[must_use]
    pub fn new(inner: Arc<dyn HabitRepository>, cache: Arc<dyn HabitListCache>) -> Self {
        Self { inner, cache }
    }

    async fn invalidate(&self, user_id: UserId) {
        if let Err(error) = self.cache.invalidate(user_id).await {
            tracing::warn!(error = %error, %user_id, "habit list cache invalidation failed");
        }
    }
}

#[async_trait]
impl HabitRepository for CachingHabitRepository {
    async fn put(&self, habit: Habit) -> AppResult<Habit> {
        let user_id = habit.user_id;
        let saved = self.inner.put(habit).await?;
        self.invalidate(user_id).await;
        Ok(saved)
    }

    async fn update(&self, habit: Habit, expected_version: i64) -> AppResult<Habit> {
        let user_id = habit.user_id;
        let saved = self.inner.update(habit, expected_version).await?;
        self.invalidate(user_id).await;
        Ok(saved)
    }

    async fn soft_delete(&self, habit_id: HabitId) -> AppResult<Habit> {
        let saved = self.inner.soft_delete(habit_id).await?;
        self.invalidate(saved.user_id).await;
        Ok(saved)
    }

    async fn find_by_id_any_owner(&self, habit_id: HabitId) -> AppResult<Option<Habit>> {
        self.inner.find_by_id_any_owner(habit_id).await
    }

    async fn find_by_id(&self, user_id: UserId, habit_id: HabitId) -> AppResult<Option<Habit>> {
        self.inner.find_by_id(user_id, habit_id).await
    }

    async fn list_live(&self, user_id: UserId) -> AppResult<Vec<Habit>> {
        match self.cache.get(user_id).await {
            Ok(Some(habits)) => return Ok(habits),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(error = %error, %user_id, "habit list cache read failed; falling through");
            }
        }

        let habits = self.inner.list_live(user_id).await?;

        if let Err(error) = self.cache.set(user_id, &habits).await {
            tracing::warn!(error = %error, %user_id, "habit list cache fill failed");
        }

        Ok(habits)
    }

    async fn get_delta(&self, user_id: UserId, cursor: DateTime<Utc>) -> AppResult<Vec<Habit>> {
        self.inner.get_delta(user_id, cursor).await
    }

    async fn update_streaks(
        &self,
        habit_id: HabitId,
        current_streak: i32,
        longest_streak: i32,
    ) -> AppResult<Habit> {
        let saved = self
            .inner
            .update_streaks(habit_id, current_streak, longest_streak)
            .await?;
        self.invalidate(saved.user_id).await;
        Ok(saved)
    }
}
