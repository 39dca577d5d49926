use std::sync::Arc;
use std::time::Duration;

use kanso_core::{AppError, AppResult};
use kanso_domain::UserId;

use crate::ports::{TokenSigner, UserRepository};

/// Per-call deadline for the liveness read in `validate` (§5).
const LIVENESS_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Mints and validates bearer credentials (§4.1). Validation is two layers:
/// `TokenSigner` checks signature, algorithm family, issuer, and expiry;
/// this service adds the liveness check — a well-formed, unexpired token
/// for a user that no longer exists is rejected identically to a malformed
/// one, so no distinction leaks to the client.
pub struct TokenService {
    signer: Arc<dyn TokenSigner>,
    user_repository: Arc<dyn UserRepository>,
}

impl TokenService {
    /// Creates a token service over a signer and the user repository used
    /// for the liveness check.
    #[must_use]
    pub fn new(signer: Arc<dyn TokenSigner>, user_repository: Arc<dyn UserRepository>) -> Self {
        Self {
            signer,
            user_repository,
        }
    }

    /// Mints a fresh token for an authenticated user.
    pub fn mint(&self, user_id: UserId) -> AppResult<String> {
        self.signer.sign(user_id)
    }

    /// Validates a bearer token end-to-end, including the liveness check.
    /// Every failure mode collapses to the same `Unauthenticated` message.
    pub async fn validate(&self, token: &str) -> AppResult<UserId> {
        let user_id = self.signer.verify(token)?;

        let user = tokio::time::timeout(LIVENESS_CHECK_TIMEOUT, self.user_repository.find_by_id(user_id))
            .await
            .map_err(|_| invalid_or_expired())?
            .map_err(|_| invalid_or_expired())?;

        if user.is_none() {
            return Err(invalid_or_expired());
        }

        Ok(user_id)
    }
}

fn invalid_or_expired() -> AppError {
    AppError::Unauthenticated("invalid or expired".to_owned())
}
