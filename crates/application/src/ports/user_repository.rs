use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kanso_core::AppResult;
use kanso_domain::{EmailAddress, UserId};

/// A persisted user row, as returned by the repository.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Stable identity.
    pub id: UserId,
    /// Normalized email.
    pub email: EmailAddress,
    /// Opaque argon2id hash; never serialized to clients.
    pub password_hash: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last-mutation instant.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a brand-new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Stable identity, generated by the service before persisting.
    pub id: UserId,
    /// Normalized email.
    pub email: EmailAddress,
    /// Opaque argon2id hash.
    pub password_hash: String,
}

/// Repository port for the `users` aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user. Returns `Conflict` if the email is already taken.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Looks up a user by normalized email.
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>>;

    /// Looks up a user by id. Used by the token service's liveness check,
    /// which callers bound to a short deadline.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Removes the user and, within the same transaction, all habits and
    /// entries it owns. Returns `NotFound` when the user does not exist.
    async fn delete_cascade(&self, user_id: UserId) -> AppResult<()>;
}
