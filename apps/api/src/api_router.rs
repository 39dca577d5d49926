use axum::Router;
use axum::http::Method;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Builds the full router: `/health` open, `/api/v1/auth/{register,login}`
/// rate-limited but unauthenticated, everything else under `/api/v1`
/// authenticated. CORS is permissive by default (§6).
pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/v1/auth/validate",
            get(handlers::auth::validate),
        )
        .route("/api/v1/auth/user", delete(handlers::auth::delete_account))
        .route(
            "/api/v1/habits",
            post(handlers::habits::create).get(handlers::habits::list),
        )
        .route(
            "/api/v1/habits/sync",
            get(handlers::habits::sync),
        )
        .route(
            "/api/v1/habits/{id}",
            put(handlers::habits::update).delete(handlers::habits::delete),
        )
        .route(
            "/api/v1/entries",
            post(handlers::entries::create).get(handlers::entries::list),
        )
        .route(
            "/api/v1/entries/sync",
            get(handlers::entries::sync),
        )
        .route(
            "/api/v1/entries/{id}",
            put(handlers::entries::update).delete(handlers::entries::delete),
        )
        .route("/api/v1/stats/weekly", get(handlers::stats::weekly))
        .route_layer(from_fn_with_state(app_state.clone(), middleware::require_auth));

    let public_auth_routes = Router::new()
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login));

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(public_auth_routes)
        .merge(protected_routes)
        .route_layer(from_fn_with_state(app_state.clone(), middleware::rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state)
}
