//! PostgreSQL-backed habit entry repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kanso_application::EntryRepository;
use kanso_core::{AppError, AppResult};
use kanso_domain::{EntryId, HabitEntry, HabitId, UserId};

/// PostgreSQL implementation of the entry repository port.
#[derive(Clone)]
pub struct PostgresEntryRepository {
    pool: PgPool,
}

impl PostgresEntryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    habit_id: Uuid,
    user_id: Uuid,
    completion_date: DateTime<Utc>,
    value: f64,
    notes: Option<String>,
    version: i64,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EntryRow> for HabitEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: EntryId::from_uuid(row.id),
            habit_id: HabitId::from_uuid(row.habit_id),
            user_id: UserId::from_uuid(row.user_id),
            completion_date: row.completion_date,
            value: row.value,
            notes: row.notes,
            version: row.version,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, habit_id, user_id, completion_date, value, notes, version,
    deleted_at, created_at, updated_at
"#;

#[async_trait]
impl EntryRepository for PostgresEntryRepository {
    async fn insert(&self, entry: HabitEntry) -> AppResult<HabitEntry> {
        let query = format!(
            r#"
            INSERT INTO habit_entries (
                id, habit_id, user_id, completion_date, value, notes, version,
                deleted_at, created_at, updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(entry.id.as_uuid())
            .bind(entry.habit_id.as_uuid())
            .bind(entry.user_id.as_uuid())
            .bind(entry.completion_date)
            .bind(entry.value)
            .bind(&entry.notes)
            .bind(entry.version)
            .bind(entry.deleted_at)
            .bind(entry.created_at)
            .bind(entry.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                if let sqlx::Error::Database(ref database_error) = error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return AppError::Conflict("an entry with this id already exists".to_owned());
                }
                AppError::Internal(format!("failed to insert entry: {error}"))
            })?;

        Ok(row.into())
    }

    async fn update(&self, entry: HabitEntry, expected_version: i64) -> AppResult<HabitEntry> {
        let query = format!(
            r#"
            UPDATE habit_entries SET
                completion_date = $3, value = $4, notes = $5, version = $6,
                deleted_at = $7, updated_at = $8
            WHERE id = $1 AND version = $2
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(entry.id.as_uuid())
            .bind(expected_version)
            .bind(entry.completion_date)
            .bind(entry.value)
            .bind(&entry.notes)
            .bind(entry.version)
            .bind(entry.deleted_at)
            .bind(entry.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to update entry: {error}")))?;

        match row {
            Some(row) => Ok(row.into()),
            None => match self.find_by_id_any_owner(entry.id).await? {
                Some(_) => Err(AppError::Conflict("entry version mismatch".to_owned())),
                None => Err(AppError::NotFound("entry not found".to_owned())),
            },
        }
    }

    async fn soft_delete(&self, entry_id: EntryId) -> AppResult<HabitEntry> {
        let query = format!(
            r#"
            UPDATE habit_entries
            SET deleted_at = now(), version = version + 1, updated_at = now()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(entry_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to soft-delete entry: {error}")))?
            .ok_or_else(|| AppError::NotFound("entry not found".to_owned()))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, user_id: UserId, entry_id: EntryId) -> AppResult<Option<HabitEntry>> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM habit_entries WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL LIMIT 1"
        );
        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(entry_id.as_uuid())
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find entry: {error}")))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id_any_owner(&self, entry_id: EntryId) -> AppResult<Option<HabitEntry>> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM habit_entries WHERE id = $1 AND deleted_at IS NULL LIMIT 1"
        );
        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(entry_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find entry: {error}")))?;

        Ok(row.map(Into::into))
    }

    async fn list_by_habit_range(
        &self,
        user_id: UserId,
        habit_id: HabitId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<HabitEntry>> {
        let query = format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM habit_entries
            WHERE user_id = $1 AND habit_id = $2 AND deleted_at IS NULL
              AND ($3::timestamptz IS NULL OR completion_date >= $3)
              AND ($4::timestamptz IS NULL OR completion_date <= $4)
            ORDER BY completion_date DESC
            "#
        );
        let rows = sqlx::query_as::<_, EntryRow>(&query)
            .bind(user_id.as_uuid())
            .bind(habit_id.as_uuid())
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list entries: {error}")))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_live_by_habit(&self, habit_id: HabitId) -> AppResult<Vec<HabitEntry>> {
        let query = format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM habit_entries
            WHERE habit_id = $1 AND deleted_at IS NULL
            ORDER BY completion_date ASC
            "#
        );
        let rows = sqlx::query_as::<_, EntryRow>(&query)
            .bind(habit_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list live entries: {error}")))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_delta(&self, user_id: UserId, cursor: DateTime<Utc>) -> AppResult<Vec<HabitEntry>> {
        let query = format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM habit_entries
            WHERE user_id = $1 AND updated_at > $2
            ORDER BY updated_at ASC
            "#
        );
        let rows = sqlx::query_as::<_, EntryRow>(&query)
            .bind(user_id.as_uuid())
            .bind(cursor)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to fetch entry delta: {error}")))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_habits_range(
        &self,
        user_id: UserId,
        habit_ids: &[HabitId],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<HabitEntry>> {
        if habit_ids.is_empty() {
            return Ok(Vec::new());
        }

        let habit_uuids: Vec<Uuid> = habit_ids.iter().map(HabitId::as_uuid).collect();
        let query = format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM habit_entries
            WHERE user_id = $1 AND habit_id = ANY($2) AND deleted_at IS NULL
              AND completion_date >= $3 AND completion_date <= $4
            ORDER BY completion_date ASC
            "#
        );
        let rows = sqlx::query_as::<_, EntryRow>(&query)
            .bind(user_id.as_uuid())
            .bind(&habit_uuids)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list entries across habits: {error}"))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
