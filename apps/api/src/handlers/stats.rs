use std::str::FromStr;

use axum::extract::{Query, State};
use axum::{Extension, Json};
use chrono_tz::Tz;
use kanso_core::{AppError, UserIdentity};
use kanso_domain::UserId;

use crate::dto::{StatsQuery, WeeklyStatsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /stats/weekly`.
pub async fn weekly(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<WeeklyStatsResponse>> {
    let time_zone = match query.time_zone {
        Some(name) => Tz::from_str(&name)
            .map_err(|_| AppError::Validation(format!("unknown time zone '{name}'")))?,
        None => chrono_tz::UTC,
    };

    let stats = state
        .stats_service
        .weekly(
            UserId::from_uuid(identity.user_id()),
            query.start_date,
            query.end_date,
            time_zone,
        )
        .await?;
    Ok(Json(WeeklyStatsResponse::from(&stats)))
}
