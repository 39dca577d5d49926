use async_trait::async_trait;
use kanso_core::AppResult;
use kanso_domain::{Habit, UserId};

/// Port for the habit-list read-through cache (§4.4). Implementations must
/// never surface a cache failure as an error to the caller: the decorator
/// that wraps this port falls through to the backing repository on any
/// `Err` rather than propagating it.
#[async_trait]
pub trait HabitListCache: Send + Sync {
    /// Returns the cached live-habit list for a user, or `None` on a miss
    /// (including an unparseable cached value, which the implementation
    /// should also clear).
    async fn get(&self, user_id: UserId) -> AppResult<Option<Vec<Habit>>>;

    /// Stores the live-habit list for a user with the cache's configured
    /// TTL. Callers ignore `Err` from this method (best-effort fill).
    async fn set(&self, user_id: UserId, habits: &[Habit]) -> AppResult<()>;

    /// Invalidates the cached list for a user.
    async fn invalidate(&self, user_id: UserId) -> AppResult<()>;
}
