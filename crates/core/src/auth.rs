use uuid::Uuid;

/// The authenticated principal a request is running as, inserted into the
/// request's extensions by the bearer-token middleware after a successful
/// token validation (signature, issuer, expiry, and user liveness).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIdentity {
    user_id: Uuid,
}

impl UserIdentity {
    /// Creates an identity for the given authenticated user id.
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    /// Returns the authenticated user's id.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}
