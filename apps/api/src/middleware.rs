use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kanso_core::{AppError, UserIdentity};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Bearer-token authentication (§4.1). Extracts `Authorization: Bearer
/// <token>`, validates it end-to-end (signature, issuer, expiry, and
/// liveness), and inserts the resulting `UserIdentity` into the request's
/// extensions for handlers to read.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| AppError::Unauthenticated("authentication required".to_owned()))?;

    let user_id = state.token_service.validate(token).await?;

    request.extensions_mut().insert(UserIdentity::new(user_id.as_uuid()));
    Ok(next.run(request).await)
}

/// Rate limiting (§4.5). Checks the single global rule for the request's
/// client IP and sets `X-RateLimit-*` headers on every response, success or
/// rejection, per §6.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let ip = extract_client_ip(&request);
    let decision = state.rate_limit_service.check_rate_limit(&ip).await;

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        ApiError::from(AppError::RateLimited {
            retry_in_s: u64::try_from(decision.reset_in_s).unwrap_or(0),
        })
        .into_response()
    };

    let headers = response.headers_mut();
    headers.insert(
        "x-ratelimit-limit",
        HeaderValue::from(decision.limit.max(0)),
    );
    headers.insert(
        "x-ratelimit-remaining",
        HeaderValue::from(decision.remaining.max(0)),
    );
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from(decision.reset_in_s.max(0)),
    );

    Ok(response)
}

/// Extracts the client IP address from request headers.
///
/// Prefers `X-Forwarded-For` (first entry) for reverse-proxy setups, falls
/// back to `X-Real-Ip`, then to `"unknown"`.
fn extract_client_ip(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .map(|ip| ip.trim().to_owned())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(|ip| ip.trim().to_owned())
        })
        .unwrap_or_else(|| "unknown".to_owned())
}
