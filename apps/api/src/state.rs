use std::sync::Arc;

use kanso_application::{
    AuthService, EntryService, HabitService, RateLimitService, StatsService, TokenService,
};

/// Shared application state, handed to every handler via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub habit_service: Arc<HabitService>,
    pub entry_service: Arc<EntryService>,
    pub stats_service: Arc<StatsService>,
    pub rate_limit_service: Arc<RateLimitService>,
    pub token_service: Arc<TokenService>,
}
