//! Redis-backed habit-list read-through cache.

use async_trait::async_trait;
use kanso_application::HabitListCache;
use kanso_core::{AppError, AppResult};
use kanso_domain::{Habit, UserId};
use redis::AsyncCommands;

/// Cache entries outlive any single request for 30 minutes, matching the
/// expected staleness window for a background-synced habit list.
const TTL_SECONDS: u64 = 30 * 60;

/// Redis implementation of the habit-list cache port.
#[derive(Clone)]
pub struct RedisHabitListCache {
    client: redis::Client,
    key_prefix: String,
}

impl RedisHabitListCache {
    /// Creates a cache adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, user_id: UserId) -> String {
        format!("{}:{}", self.key_prefix, user_id.as_uuid())
    }
}

#[async_trait]
impl HabitListCache for RedisHabitListCache {
    async fn get(&self, user_id: UserId) -> AppResult<Option<Vec<Habit>>> {
        let key = self.key_for(user_id);
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

        let encoded: Option<String> = connection
            .get(&key)
            .await
            .map_err(|error| AppError::Internal(format!("failed to read habit cache: {error}")))?;

        let Some(encoded) = encoded else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<Habit>>(&encoded) {
            Ok(habits) => Ok(Some(habits)),
            Err(_) => {
                let _: Result<(), _> = connection.del(&key).await;
                Ok(None)
            }
        }
    }

    async fn set(&self, user_id: UserId, habits: &[Habit]) -> AppResult<()> {
        let key = self.key_for(user_id);
        let encoded = serde_json::to_string(habits)
            .map_err(|error| AppError::Internal(format!("failed to encode habit cache: {error}")))?;

        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

        connection
            .set_ex(key, encoded, TTL_SECONDS)
            .await
            .map_err(|error| AppError::Internal(format!("failed to write habit cache: {error}")))
    }

    async fn invalidate(&self, user_id: UserId) -> AppResult<()> {
        let key = self.key_for(user_id);
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

        connection
            .del(key)
            .await
            .map_err(|error| AppError::Internal(format!("failed to invalidate habit cache: {error}")))
    }
}
