//! In-memory fakes for composing a full `AppState` in handler tests,
//! mirroring the port fakes used in each service's own test module but
//! shared here since handler tests exercise several services together.
#![cfg(test)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kanso_application::{
    AttemptInfo, AuthService, EntryRepository, EntryService, HabitRepository, HabitService,
    NewUser, RateLimitRepository, RateLimitRule, RateLimitService, StatsService, StreakQueue,
    TokenService, UserRecord, UserRepository,
};
use kanso_core::AppResult;
use kanso_domain::{EmailAddress, EntryId, Habit, HabitEntry, HabitId, UserId};
use kanso_infrastructure::{Argon2PasswordHasher, JwtTokenSigner};

use crate::state::AppState;

#[derive(Default)]
pub struct InMemoryUsers {
    by_id: Mutex<HashMap<UserId, UserRecord>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let now = Utc::now();
        let record = UserRecord {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        self.by_id.lock().expect("lock").insert(user.id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        Ok(self
            .by_id
            .lock()
            .expect("lock")
            .values()
            .find(|record| record.email.as_str() == email.as_str())
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.by_id.lock().expect("lock").get(&user_id).cloned())
    }

    async fn delete_cascade(&self, user_id: UserId) -> AppResult<()> {
        self.by_id.lock().expect("lock").remove(&user_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryHabits {
    rows: Mutex<HashMap<HabitId, Habit>>,
}

#[async_trait]
impl HabitRepository for InMemoryHabits {
    async fn put(&self, habit: Habit) -> AppResult<Habit> {
        self.rows.lock().expect("lock").insert(habit.id, habit.clone());
        Ok(habit)
    }

    async fn update(&self, habit: Habit, _expected_version: i64) -> AppResult<Habit> {
        self.rows.lock().expect("lock").insert(habit.id, habit.clone());
        Ok(habit)
    }

    async fn soft_delete(&self, habit_id: HabitId) -> AppResult<Habit> {
        let mut rows = self.rows.lock().expect("lock");
        let habit = rows.get_mut(&habit_id).expect("habit exists");
        habit.deleted_at = Some(Utc::now());
        habit.version += 1;
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
        let habit = rows.get_mut(&habit_id).expect("habit exists");
        habit.current_streak = current_streak;
        habit.longest_streak = longest_streak;
        Ok(habit.clone())
    }
}

#[derive(Default)]
pub struct InMemoryEntries {
    rows: Mutex<HashMap<EntryId, HabitEntry>>,
}

#[async_trait]
impl EntryRepository for InMemoryEntries {
    async fn insert(&self, entry: HabitEntry) -> AppResult<HabitEntry> {
        self.rows.lock().expect("lock").insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update(&self, entry: HabitEntry, _expected_version: i64) -> AppResult<HabitEntry> {
        self.rows.lock().expect("lock").insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn soft_delete(&self, entry_id: EntryId) -> AppResult<HabitEntry> {
        let mut rows = self.rows.lock().expect("lock");
        let entry = rows.get_mut(&entry_id).expect("entry exists");
        entry.deleted_at = Some(Utc::now());
        entry.version += 1;
        Ok(entry.clone())
    }

    async fn find_by_id(&self, user_id: UserId, entry_id: EntryId) -> AppResult<Option<HabitEntry>> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .get(&entry_id)
            .filter(|entry| entry.user_id == user_id && entry.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_id_any_owner(&self, entry_id: EntryId) -> AppResult<Option<HabitEntry>> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .get(&entry_id)
            .filter(|entry| entry.deleted_at.is_none())
            .cloned())
    }

    async fn list_by_habit_range(
        &self,
        user_id: UserId,
        habit_id: HabitId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<HabitEntry>> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .values()
            .filter(|entry| {
                entry.user_id == user_id
                    && entry.habit_id == habit_id
                    && entry.deleted_at.is_none()
                    && from.is_none_or(|from| entry.completion_date >= from)
                    && to.is_none_or(|to| entry.completion_date <= to)
            })
            .cloned()
            .collect())
    }

    async fn list_live_by_habit(&self, habit_id: HabitId) -> AppResult<Vec<HabitEntry>> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .values()
            .filter(|entry| entry.habit_id == habit_id && entry.deleted_at.is_none())
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
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<HabitEntry>> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .values()
            .filter(|entry| {
                entry.user_id == user_id
                    && habit_ids.contains(&entry.habit_id)
                    && entry.deleted_at.is_none()
                    && entry.completion_date >= from
                    && entry.completion_date <= to
            })
            .cloned()
            .collect())
    }
}

/// Always accepts the enqueue; streak recomputation isn't exercised by
/// handler-level tests.
pub struct NullStreakQueue;

impl StreakQueue for NullStreakQueue {
    fn try_enqueue(&self, _habit_id: HabitId) -> bool {
        true
    }
}

/// A rate-limit repository that never reports an attempt count high enough
/// to deny a request, so handler tests never see a 429.
#[derive(Default)]
pub struct NeverLimitingRateLimitRepository;

#[async_trait]
impl RateLimitRepository for NeverLimitingRateLimitRepository {
    async fn record_attempt(&self, _key: &str, _window_duration_seconds: i64) -> AppResult<AttemptInfo> {
        Ok(AttemptInfo {
            attempt_count: 1,
            window_started_at: Utc::now(),
        })
    }

    async fn cleanup_expired(&self, _before: DateTime<Utc>) -> AppResult<u64> {
        Ok(0)
    }
}

/// Builds a fully wired `AppState` over in-memory/real-but-local
/// collaborators: real Argon2 hashing and real JWT signing, fake
/// repositories. No network I/O anywhere in the graph.
pub fn build_app_state() -> AppState {
    let user_repository: Arc<dyn UserRepository> = Arc::new(InMemoryUsers::default());
    let habit_repository: Arc<dyn HabitRepository> = Arc::new(InMemoryHabits::default());
    let entry_repository: Arc<dyn EntryRepository> = Arc::new(InMemoryEntries::default());

    let token_signer = Arc::new(JwtTokenSigner::new("test-secret-value", "kanso-sync", 3_600));
    let token_service = Arc::new(TokenService::new(token_signer, user_repository.clone()));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        Arc::new(Argon2PasswordHasher::new()),
        token_service.clone(),
    ));

    let habit_service = Arc::new(HabitService::new(habit_repository.clone()));
    let entry_service = Arc::new(EntryService::new(
        entry_repository.clone(),
        habit_repository.clone(),
        Arc::new(NullStreakQueue),
    ));
    let stats_service = Arc::new(StatsService::new(habit_repository, entry_repository));

    let rate_limit_service = Arc::new(RateLimitService::new(
        Arc::new(NeverLimitingRateLimitRepository),
        RateLimitRule::new(1_000_000, 60),
    ));

    AppState {
        auth_service,
        habit_service,
        entry_service,
        stats_service,
        rate_limit_service,
        token_service,
    }
}
