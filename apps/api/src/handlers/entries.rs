use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use kanso_application::{EntryPatch, NewEntryInput};
use kanso_core::UserIdentity;
use kanso_domain::{EntryId, HabitEntry, HabitId, UserId};
use uuid::Uuid;

use crate::dto::{EntryCreateRequest, EntryPatchRequest, EntryQuery, EntrySyncQuery, SyncResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /entries`.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(body): Json<EntryCreateRequest>,
) -> ApiResult<(StatusCode, Json<HabitEntry>)> {
    let habit_id = HabitId::from_uuid(body.habit_id);
    let input = NewEntryInput {
        id: body.id.map(EntryId::from_uuid),
        completion_date: body.completion_date,
        value: body.value,
        notes: body.notes,
    };
    let entry = state
        .entry_service
        .create(UserId::from_uuid(identity.user_id()), habit_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /entries`.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<EntryQuery>,
) -> ApiResult<Json<Vec<HabitEntry>>> {
    let entries = state
        .entry_service
        .list_by_habit(
            UserId::from_uuid(identity.user_id()),
            HabitId::from_uuid(query.habit_id),
            query.from,
            query.to,
        )
        .await?;
    Ok(Json(entries))
}

/// `PUT /entries/:id`.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<EntryPatchRequest>,
) -> ApiResult<Json<HabitEntry>> {
    let patch: EntryPatch = body.into();
    let entry = state
        .entry_service
        .update(
            UserId::from_uuid(identity.user_id()),
            EntryId::from_uuid(entry_id),
            patch,
        )
        .await?;
    Ok(Json(entry))
}

/// `DELETE /entries/:id`.
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(entry_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .entry_service
        .delete(
            UserId::from_uuid(identity.user_id()),
            EntryId::from_uuid(entry_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /entries/sync`.
pub async fn sync(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<EntrySyncQuery>,
) -> ApiResult<Json<SyncResponse<HabitEntry>>> {
    let (changes, timestamp) = state
        .entry_service
        .get_delta(UserId::from_uuid(identity.user_id()), query.since)
        .await?;
    Ok(Json(SyncResponse { changes, timestamp }))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use kanso_application::HabitPatch;
    use kanso_core::AppError;

    use super::*;
    use crate::error::ApiError;
    use crate::test_support::build_app_state;

    async fn seed_habit(state: &AppState, owner: UserId) -> HabitId {
        state
            .habit_service
            .create(
                owner,
                None,
                HabitPatch {
                    title: Some("Drink water".to_owned()),
                    ..HabitPatch::default()
                },
            )
            .await
            .expect("habit creation should succeed")
            .id
    }

    #[tokio::test]
    async fn create_then_list_returns_the_new_entry() {
        let state = build_app_state();
        let owner = UserId::new();
        let habit_id = seed_habit(&state, owner).await;
        let identity = UserIdentity::new(owner.as_uuid());

        let (status, Json(created)) = create(
            State(state.clone()),
            Extension(identity),
            Json(EntryCreateRequest {
                id: None,
                habit_id: habit_id.as_uuid(),
                completion_date: Utc::now(),
                value: 1.0,
                notes: None,
            }),
        )
        .await
        .expect("create should succeed");
        assert_eq!(status, StatusCode::CREATED);

        let Json(entries) = list(
            State(state),
            Extension(identity),
            Query(EntryQuery {
                habit_id: habit_id.as_uuid(),
                from: None,
                to: None,
            }),
        )
        .await
        .expect("list should succeed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, created.id);
    }

    #[tokio::test]
    async fn create_entry_for_someone_elses_habit_is_forbidden() {
        let state = build_app_state();
        let owner = UserId::new();
        let habit_id = seed_habit(&state, owner).await;
        let intruder = UserIdentity::new(Uuid::new_v4());

        let result = create(
            State(state),
            Extension(intruder),
            Json(EntryCreateRequest {
                id: None,
                habit_id: habit_id.as_uuid(),
                completion_date: Utc::now(),
                value: 1.0,
                notes: None,
            }),
        )
        .await;

        let Err(ApiError(AppError::Forbidden(_))) = result else {
            panic!("expected forbidden error, got {result:?}");
        };
    }

    #[tokio::test]
    async fn delete_by_different_owner_is_forbidden() {
        let state = build_app_state();
        let owner = UserId::new();
        let habit_id = seed_habit(&state, owner).await;
        let owner_identity = UserIdentity::new(owner.as_uuid());

        let (_, Json(created)) = create(
            State(state.clone()),
            Extension(owner_identity),
            Json(EntryCreateRequest {
                id: None,
                habit_id: habit_id.as_uuid(),
                completion_date: Utc::now(),
                value: 1.0,
                notes: None,
            }),
        )
        .await
        .expect("create should succeed");

        let intruder = UserIdentity::new(Uuid::new_v4());
        let result = delete(State(state), Extension(intruder), Path(created.id.as_uuid())).await;

        let Err(ApiError(AppError::Forbidden(_))) = result else {
            panic!("expected forbidden error, got {result:?}");
        };
    }
}
