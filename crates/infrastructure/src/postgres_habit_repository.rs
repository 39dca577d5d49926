//! PostgreSQL-backed habit repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use kanso_application::HabitRepository;
use kanso_core::{AppError, AppResult};
use kanso_domain::{FrequencyType, Habit, HabitId, HabitType, UserId};

/// PostgreSQL implementation of the habit repository port.
#[derive(Clone)]
pub struct PostgresHabitRepository {
    pool: PgPool,
}

impl PostgresHabitRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HabitRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    sort_order: i32,
    habit_type: String,
    frequency_type: String,
    weekdays: Json<Vec<u8>>,
    interval: i32,
    reminder_time: Option<String>,
    unit: Option<String>,
    target_value: i32,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    archived_at: Option<DateTime<Utc>>,
    version: i64,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    current_streak: i32,
    longest_streak: i32,
}

impl TryFrom<HabitRow> for Habit {
    type Error = AppError;

    fn try_from(row: HabitRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: HabitId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            description: row.description,
            color: row.color,
            icon: row.icon,
            sort_order: row.sort_order,
            habit_type: HabitType::parse(&row.habit_type)?,
            frequency_type: FrequencyType::parse(&row.frequency_type)?,
            weekdays: row.weekdays.0,
            interval: row.interval,
            reminder_time: row.reminder_time,
            unit: row.unit,
            target_value: row.target_value,
            start_date: row.start_date,
            end_date: row.end_date,
            archived_at: row.archived_at,
            version: row.version,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            current_streak: row.current_streak,
            longest_streak: row.longest_streak,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    id, user_id, title, description, color, icon, sort_order, habit_type,
    frequency_type, weekdays, interval, reminder_time, unit, target_value,
    start_date, end_date, archived_at, version, deleted_at, created_at,
    updated_at, current_streak, longest_streak
"#;

#[async_trait]
impl HabitRepository for PostgresHabitRepository {
    async fn put(&self, habit: Habit) -> AppResult<Habit> {
        let query = format!(
            r#"
            INSERT INTO habits (
                id, user_id, title, description, color, icon, sort_order, habit_type,
                frequency_type, weekdays, interval, reminder_time, unit, target_value,
                start_date, end_date, archived_at, version, deleted_at, created_at,
                updated_at, current_streak, longest_streak
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21,$22,$23)
            ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                color = EXCLUDED.color,
                icon = EXCLUDED.icon,
                sort_order = EXCLUDED.sort_order,
                habit_type = EXCLUDED.habit_type,
                frequency_type = EXCLUDED.frequency_type,
                weekdays = EXCLUDED.weekdays,
                interval = EXCLUDED.interval,
                reminder_time = EXCLUDED.reminder_time,
                unit = EXCLUDED.unit,
                target_value = EXCLUDED.target_value,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                archived_at = EXCLUDED.archived_at,
                version = EXCLUDED.version,
                deleted_at = EXCLUDED.deleted_at,
                updated_at = EXCLUDED.updated_at,
                current_streak = EXCLUDED.current_streak,
                longest_streak = EXCLUDED.longest_streak
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, HabitRow>(&query)
            .bind(habit.id.as_uuid())
            .bind(habit.user_id.as_uuid())
            .bind(&habit.title)
            .bind(&habit.description)
            .bind(&habit.color)
            .bind(&habit.icon)
            .bind(habit.sort_order)
            .bind(habit.habit_type.as_str())
            .bind(habit.frequency_type.as_str())
            .bind(Json(habit.weekdays))
            .bind(habit.interval)
            .bind(&habit.reminder_time)
            .bind(&habit.unit)
            .bind(habit.target_value)
            .bind(habit.start_date)
            .bind(habit.end_date)
            .bind(habit.archived_at)
            .bind(habit.version)
            .bind(habit.deleted_at)
            .bind(habit.created_at)
            .bind(habit.updated_at)
            .bind(habit.current_streak)
            .bind(habit.longest_streak)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to put habit: {error}")))?;

        row.try_into()
    }

    async fn update(&self, habit: Habit, expected_version: i64) -> AppResult<Habit> {
        let query = format!(
            r#"
            UPDATE habits SET
                title = $3, description = $4, color = $5, icon = $6, sort_order = $7,
                habit_type = $8, frequency_type = $9, weekdays = $10, interval = $11,
                reminder_time = $12, unit = $13, target_value = $14, start_date = $15,
                end_date = $16, archived_at = $17, version = $18, deleted_at = $19,
                updated_at = $20, current_streak = $21, longest_streak = $22
            WHERE id = $1 AND version = $2
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, HabitRow>(&query)
            .bind(habit.id.as_uuid())
            .bind(expected_version)
            .bind(&habit.title)
            .bind(&habit.description)
            .bind(&habit.color)
            .bind(&habit.icon)
            .bind(habit.sort_order)
            .bind(habit.habit_type.as_str())
            .bind(habit.frequency_type.as_str())
            .bind(Json(habit.weekdays))
            .bind(habit.interval)
            .bind(&habit.reminder_time)
            .bind(&habit.unit)
            .bind(habit.target_value)
            .bind(habit.start_date)
            .bind(habit.end_date)
            .bind(habit.archived_at)
            .bind(habit.version)
            .bind(habit.deleted_at)
            .bind(habit.updated_at)
            .bind(habit.current_streak)
            .bind(habit.longest_streak)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to update habit: {error}")))?;

        match row {
            Some(row) => row.try_into(),
            None => match self.find_by_id_any_owner(habit.id).await? {
                Some(_) => Err(AppError::Conflict("habit version mismatch".to_owned())),
                None => Err(AppError::NotFound("habit not found".to_owned())),
            },
        }
    }

    async fn soft_delete(&self, habit_id: HabitId) -> AppResult<Habit> {
        let query = format!(
            r#"
            UPDATE habits
            SET deleted_at = now(), version = version + 1, updated_at = now()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, HabitRow>(&query)
            .bind(habit_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to soft-delete habit: {error}")))?
            .ok_or_else(|| AppError::NotFound("habit not found".to_owned()))?;

        row.try_into()
    }

    async fn find_by_id_any_owner(&self, habit_id: HabitId) -> AppResult<Option<Habit>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM habits WHERE id = $1 LIMIT 1");
        let row = sqlx::query_as::<_, HabitRow>(&query)
            .bind(habit_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find habit: {error}")))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_id(&self, user_id: UserId, habit_id: HabitId) -> AppResult<Option<Habit>> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM habits WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL LIMIT 1"
        );
        let row = sqlx::query_as::<_, HabitRow>(&query)
            .bind(habit_id.as_uuid())
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find habit: {error}")))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_live(&self, user_id: UserId) -> AppResult<Vec<Habit>> {
        let query = format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM habits
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY sort_order ASC, created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, HabitRow>(&query)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list habits: {error}")))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_delta(&self, user_id: UserId, cursor: DateTime<Utc>) -> AppResult<Vec<Habit>> {
        let query = format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM habits
            WHERE user_id = $1 AND updated_at > $2
            ORDER BY updated_at ASC
            "#
        );
        let rows = sqlx::query_as::<_, HabitRow>(&query)
            .bind(user_id.as_uuid())
            .bind(cursor)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to fetch habit delta: {error}")))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_streaks(
        &self,
        habit_id: HabitId,
        current_streak: i32,
        longest_streak: i32,
    ) -> AppResult<Habit> {
        let query = format!(
            r#"
            UPDATE habits
            SET current_streak = $2, longest_streak = $3, updated_at = now()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, HabitRow>(&query)
            .bind(habit_id.as_uuid())
            .bind(current_streak)
            .bind(longest_streak)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to update streaks: {error}")))?
            .ok_or_else(|| AppError::NotFound("habit not found".to_owned()))?;

        row.try_into()
    }
}
