//! Capability ports consumed by the application services. Every storage or
//! infrastructure dependency is expressed as a narrow trait here; concrete
//! adapters live in `kanso-infrastructure`.

mod cache;
mod entry_repository;
mod habit_repository;
mod password_hasher;
mod streak_queue;
mod token_signer;
mod user_repository;

pub use cache::HabitListCache;
pub use entry_repository::EntryRepository;
pub use habit_repository::HabitRepository;
pub use password_hasher::PasswordHasher;
pub use streak_queue::StreakQueue;
pub use token_signer::TokenSigner;
pub use user_repository::{NewUser, UserRecord, UserRepository};
