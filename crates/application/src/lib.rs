//! Application services orchestrating the sync engine's core behavior:
//! authentication, habit/entry lifecycle, the cache decorator, the streak
//! worker, stats, and rate limiting.
#![forbid(unsafe_code)]

pub mod ports;

mod auth_service;
mod cache_repository;
mod entry_service;
mod habit_service;
mod rate_limit_service;
mod stats_service;
mod streak_worker;
mod token_service;

pub use auth_service::{AuthService, AuthenticatedSession, UserSummary};
pub use cache_repository::CachingHabitRepository;
pub use entry_service::{EntryPatch, EntryService, NewEntryInput};
pub use habit_service::{HabitPatch, HabitService};
pub use ports::{
    EntryRepository, HabitListCache, HabitRepository, NewUser, PasswordHasher, StreakQueue,
    TokenSigner, UserRecord, UserRepository,
};
pub use rate_limit_service::{
    AttemptInfo, RateLimitDecision, RateLimitRepository, RateLimitRule, RateLimitService,
};
pub use stats_service::{HabitStats, StatsService, WeeklyStats, MAX_RANGE_DAYS};
pub use streak_worker::{
    spawn_streak_worker, ChannelStreakQueue, StreakWorkerHandle, DEFAULT_QUEUE_CAPACITY,
};
pub use token_service::TokenService;
