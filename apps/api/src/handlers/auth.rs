use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use kanso_core::UserIdentity;

use crate::dto::{
    DeleteAccountResponse, LoginRequest, LoginResponse, RegisterRequest, UserResponse,
    ValidateResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /auth/register`.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let summary = state
        .auth_service
        .register(&body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&summary))))
}

/// `POST /auth/login`.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state.auth_service.login(&body.email, &body.password).await?;
    Ok(Json(LoginResponse::from(&session)))
}

/// `GET /auth/validate`. Reaching this handler at all means
/// `require_auth` already validated the bearer token.
pub async fn validate(Extension(identity): Extension<UserIdentity>) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        user_id: identity.user_id(),
    })
}

/// `DELETE /auth/user`.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<DeleteAccountResponse>> {
    state
        .auth_service
        .delete_account(kanso_domain::UserId::from_uuid(identity.user_id()))
        .await?;
    Ok(Json(DeleteAccountResponse::default()))
}

#[cfg(test)]
mod tests {
    use kanso_core::AppError;

    use super::*;
    use crate::error::ApiError;
    use crate::test_support::build_app_state;

    #[tokio::test]
    async fn register_then_login_round_trips_a_session() {
        let state = build_app_state();

        let register_result = register(
            State(state.clone()),
            Json(RegisterRequest {
                email: "person@example.com".to_owned(),
                password: "correct-horse-battery-staple".to_owned(),
            }),
        )
        .await;
        assert!(register_result.is_ok());

        let login_result = login(
            State(state),
            Json(LoginRequest {
                email: "person@example.com".to_owned(),
                password: "correct-horse-battery-staple".to_owned(),
            }),
        )
        .await;
        let Ok(Json(session)) = login_result else {
            panic!("expected login to succeed");
        };
        assert!(!session.token.is_empty());
        assert_eq!(session.user.email, "person@example.com");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthenticated() {
        let state = build_app_state();
        register(
            State(state.clone()),
            Json(RegisterRequest {
                email: "person@example.com".to_owned(),
                password: "correct-horse-battery-staple".to_owned(),
            }),
        )
        .await
        .expect("register should succeed");

        let result = login(
            State(state),
            Json(LoginRequest {
                email: "person@example.com".to_owned(),
                password: "wrong-password".to_owned(),
            }),
        )
        .await;

        let Err(ApiError(AppError::Unauthenticated(_))) = result else {
            panic!("expected unauthenticated error, got {result:?}");
        };
    }

    #[tokio::test]
    async fn validate_echoes_the_authenticated_identity() {
        let user_id = uuid::Uuid::new_v4();
        let Json(response) = validate(Extension(UserIdentity::new(user_id))).await;
        assert_eq!(response.user_id, user_id);
    }
}
