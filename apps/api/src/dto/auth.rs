use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kanso_application::{AuthenticatedSession, UserSummary};

/// `POST /auth/register` and `/auth/login` request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

pub use RegisterRequest as LoginRequest;

/// Public shape of a user, returned from register/login/validate.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
}

impl From<&UserSummary> for UserResponse {
    fn from(summary: &UserSummary) -> Self {
        Self {
            id: summary.id.as_uuid(),
            email: summary.email.as_str().to_owned(),
        }
    }
}

/// `POST /auth/login` response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<&AuthenticatedSession> for LoginResponse {
    fn from(session: &AuthenticatedSession) -> Self {
        Self {
            token: session.token.clone(),
            user: UserResponse::from(&session.user),
        }
    }
}

/// `GET /auth/validate` response.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub user_id: Uuid,
}

/// `DELETE /auth/user` response.
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub message: &'static str,
}

impl Default for DeleteAccountResponse {
    fn default() -> Self {
        Self {
            message: "account deleted",
        }
    }
}
