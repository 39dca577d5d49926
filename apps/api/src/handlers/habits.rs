use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use kanso_application::HabitPatch;
use kanso_core::UserIdentity;
use kanso_domain::{Habit, HabitId, UserId};
use uuid::Uuid;

use crate::dto::{HabitPatchRequest, HabitSyncQuery, SyncResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /habits`.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(body): Json<HabitPatchRequest>,
) -> ApiResult<(StatusCode, Json<Habit>)> {
    let habit_id = body.id.map(HabitId::from_uuid);
    let patch: HabitPatch = body.into();
    let habit = state
        .habit_service
        .create(UserId::from_uuid(identity.user_id()), habit_id, patch)
        .await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

/// `GET /habits`.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<Habit>>> {
    let habits = state
        .habit_service
        .list(UserId::from_uuid(identity.user_id()))
        .await?;
    Ok(Json(habits))
}

/// `PUT /habits/:id`.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(habit_id): Path<Uuid>,
    Json(body): Json<HabitPatchRequest>,
) -> ApiResult<Json<Habit>> {
    let patch: HabitPatch = body.into();
    let habit = state
        .habit_service
        .update(
            UserId::from_uuid(identity.user_id()),
            HabitId::from_uuid(habit_id),
            patch,
        )
        .await?;
    Ok(Json(habit))
}

/// `DELETE /habits/:id`.
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(habit_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .habit_service
        .delete(
            UserId::from_uuid(identity.user_id()),
            HabitId::from_uuid(habit_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /habits/sync`.
pub async fn sync(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<HabitSyncQuery>,
) -> ApiResult<Json<SyncResponse<Habit>>> {
    let (changes, timestamp) = state
        .habit_service
        .get_delta(UserId::from_uuid(identity.user_id()), query.last_sync)
        .await?;
    Ok(Json(SyncResponse { changes, timestamp }))
}
