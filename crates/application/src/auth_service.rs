use std::sync::Arc;
use std::time::Duration;

use kanso_core::{AppError, AppResult};
use kanso_domain::{EmailAddress, UserId, validate_password};

use crate::ports::{NewUser, PasswordHasher, UserRepository};
use crate::token_service::TokenService;

/// Per-call deadline for the cascading delete in `delete_account` (§5).
const ACCOUNT_DELETE_TIMEOUT: Duration = Duration::from_secs(5);

/// The fields returned to a client after register/login — never the hash.
#[derive(Debug, Clone)]
pub struct UserSummary {
    /// The user's id.
    pub id: UserId,
    /// The user's normalized email.
    pub email: EmailAddress,
}

/// A freshly minted token plus the authenticated user's summary.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: UserSummary,
}

/// Registers, authenticates, and deletes accounts (§4.1).
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Creates an auth service over its three collaborators.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_service,
        }
    }

    /// Registers a new user. Never returns the password hash.
    pub async fn register(&self, email: &str, password: &str) -> AppResult<UserSummary> {
        let email = EmailAddress::new(email)?;
        validate_password(password)?;

        let password_hash = self.password_hasher.hash_password(password)?;

        let record = self
            .user_repository
            .create(NewUser {
                id: UserId::new(),
                email,
                password_hash,
            })
            .await?;

        Ok(UserSummary {
            id: record.id,
            email: record.email,
        })
    }

    /// Logs in by email/password. A missing user and a wrong password are
    /// indistinguishable to the caller (§4.1, §7 — no enumeration).
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedSession> {
        let invalid_credentials = || AppError::Unauthenticated("invalid credentials".to_owned());

        let email = EmailAddress::new(email).map_err(|_| invalid_credentials())?;

        let record = self
            .user_repository
            .find_by_email(&email)
            .await
            .map_err(|_| invalid_credentials())?
            .ok_or_else(invalid_credentials)?;

        let verified = self
            .password_hasher
            .verify_password(password, &record.password_hash)
            .map_err(|_| invalid_credentials())?;
        if !verified {
            return Err(invalid_credentials());
        }

        let token = self.token_service.mint(record.id)?;

        Ok(AuthenticatedSession {
            token,
            user: UserSummary {
                id: record.id,
                email: record.email,
            },
        })
    }

    /// Deletes the account and, within one transaction, every habit and
    /// entry it owns (§4.1).
    pub async fn delete_account(&self, user_id: UserId) -> AppResult<()> {
        tokio::time::timeout(ACCOUNT_DELETE_TIMEOUT, self.user_repository.delete_cascade(user_id))
            .await
            .map_err(|_| AppError::Internal("account deletion timed out".to_owned()))?
    }
}
