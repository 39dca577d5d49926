//! Infrastructure adapters for application ports: PostgreSQL repositories,
//! the Redis rate limiter and habit-list cache, Argon2 password hashing, and
//! JWT bearer tokens.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod jwt_token_signer;
mod postgres_entry_repository;
mod postgres_habit_repository;
mod postgres_user_repository;
mod redis_habit_list_cache;
mod redis_rate_limit_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_signer::JwtTokenSigner;
pub use postgres_entry_repository::PostgresEntryRepository;
pub use postgres_habit_repository::PostgresHabitRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use redis_habit_list_cache::RedisHabitListCache;
pub use redis_rate_limit_repository::RedisRateLimitRepository;
