use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use kanso_core::AppError;
use tracing_subscriber::EnvFilter;

/// Runtime configuration loaded once at startup (§10.3).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub redis_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl_seconds: i64,
    pub rate_limit_max_attempts: i32,
    pub rate_limit_window_seconds: i64,
    pub streak_queue_capacity: usize,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let db_host = env::var("DB_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let db_port = parse_env_u16("DB_PORT", 5432)?;
        let db_name = required_env("DB_NAME")?;
        let db_user = required_env("DB_USER")?;
        let db_password = required_env("DB_PASSWORD")?;
        let db_pool_max_connections = parse_env_u32("DB_POOL_MAX_CONNECTIONS", 10)?;
        let database_url = format!(
            "postgres://{db_user}:{db_password}@{db_host}:{db_port}/{db_name}?max_connections={db_pool_max_connections}"
        );

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_owned());
        let api_port = parse_env_u16("PORT", 8080)?;

        let jwt_secret = required_env("JWT_SECRET")?;
        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "kanso-sync".to_owned());
        let jwt_ttl_seconds = parse_env_i64("JWT_TTL_SECONDS", 86_400)?;

        let rate_limit_max_attempts = parse_env_i32("RATE_LIMIT_MAX_ATTEMPTS", 100)?;
        let rate_limit_window_seconds = parse_env_i64("RATE_LIMIT_WINDOW_SECONDS", 60)?;

        let streak_queue_capacity = parse_env_usize("STREAK_QUEUE_CAPACITY", 100)?;

        Ok(Self {
            migrate_only,
            database_url,
            redis_url,
            api_host,
            api_port,
            jwt_secret,
            jwt_issuer,
            jwt_ttl_seconds,
            rate_limit_max_attempts,
            rate_limit_window_seconds,
            streak_queue_capacity,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, AppError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}"))),
        Err(_) => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, AppError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u32>()
            .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}"))),
        Err(_) => Ok(default),
    }
}

fn parse_env_i32(name: &str, default: i32) -> Result<i32, AppError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<i32>()
            .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}"))),
        Err(_) => Ok(default),
    }
}

fn parse_env_i64(name: &str, default: i64) -> Result<i64, AppError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<i64>()
            .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}"))),
        Err(_) => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, AppError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<usize>()
            .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}"))),
        Err(_) => Ok(default),
    }
}
