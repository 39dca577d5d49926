use axum::Json;

use crate::dto::HealthResponse;

/// `GET /health`.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
