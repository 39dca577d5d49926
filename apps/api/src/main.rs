//! Kanso sync API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use kanso_application::{
    AuthService, CachingHabitRepository, EntryService, HabitService, RateLimitRule,
    RateLimitService, StatsService, TokenService,
};
use kanso_core::AppError;
use kanso_infrastructure::{
    Argon2PasswordHasher, JwtTokenSigner, PostgresEntryRepository, PostgresHabitRepository,
    PostgresUserRepository, RedisHabitListCache, RedisRateLimitRepository,
};
use tracing::info;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = api_config::ApiConfig::load()?;

    let pool = api_services::connect_and_migrate(&config.database_url).await?;
    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let redis_client = api_services::build_redis_client(&config.redis_url)?;

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let habit_repository = Arc::new(PostgresHabitRepository::new(pool.clone()));
    let entry_repository = Arc::new(PostgresEntryRepository::new(pool.clone()));

    let habit_list_cache = Arc::new(RedisHabitListCache::new(
        redis_client.clone(),
        "habit_list",
    ));
    let cached_habit_repository = Arc::new(CachingHabitRepository::new(
        habit_repository.clone(),
        habit_list_cache,
    ));

    let token_signer = Arc::new(JwtTokenSigner::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
        config.jwt_ttl_seconds,
    ));
    let token_service = Arc::new(TokenService::new(token_signer, user_repository.clone()));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        Arc::new(Argon2PasswordHasher::new()),
        token_service.clone(),
    ));

    let (streak_queue, _worker_handle, _worker_task) = kanso_application::spawn_streak_worker(
        cached_habit_repository.clone(),
        entry_repository.clone(),
        config.streak_queue_capacity,
    );

    let habit_service = Arc::new(HabitService::new(cached_habit_repository.clone()));
    let entry_service = Arc::new(EntryService::new(
        entry_repository.clone(),
        cached_habit_repository.clone(),
        streak_queue,
    ));
    let stats_service = Arc::new(StatsService::new(cached_habit_repository, entry_repository));

    let rate_limit_repository = Arc::new(RedisRateLimitRepository::new(
        redis_client,
        "rate_limit",
    ));
    let rate_limit_rule = RateLimitRule::new(
        config.rate_limit_max_attempts,
        config.rate_limit_window_seconds,
    );
    let rate_limit_service = Arc::new(RateLimitService::new(rate_limit_repository, rate_limit_rule));

    let app_state = AppState {
        auth_service,
        habit_service,
        entry_service,
        stats_service,
        rate_limit_service,
        token_service,
    };

    let app = api_router::build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "kanso-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
