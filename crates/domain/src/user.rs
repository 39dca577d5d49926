use std::fmt::{Display, Formatter};

use kanso_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum accepted password length, in Unicode scalar values.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum accepted password length; guards against hashing
/// attacker-supplied multi-megabyte strings.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Identity of a registered account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a random user id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID as a user id.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A normalized, structurally-validated email address.
///
/// Normalization is trim + lowercase; validation is a structural subset of
/// RFC5322 (single `@`, non-empty local and domain parts, domain containing
/// at least one `.`) rather than the full grammar — sufficient to reject
/// the malformed input real clients send without pulling in a parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalizes and validates a raw email address.
    pub fn new(raw: &str) -> AppResult<Self> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::Validation("email must not be empty".to_owned()));
        }
        if normalized.len() > 254 {
            return Err(AppError::Validation("email is too long".to_owned()));
        }

        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().ok_or_else(|| {
            AppError::Validation("email must contain exactly one '@'".to_owned())
        })?;

        if normalized.matches('@').count() != 1 {
            return Err(AppError::Validation(
                "email must contain exactly one '@'".to_owned(),
            ));
        }
        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }
        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain a '.'".to_owned(),
            ));
        }
        if domain.starts_with('.') || domain.ends_with('.') {
            return Err(AppError::Validation(
                "email domain must not start or end with '.'".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized email as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EmailAddress {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validates a candidate password against the minimum length policy.
///
/// Hashing is an infrastructure concern (argon2id); this only enforces the
/// policy gate described before a password ever reaches the hasher.
pub fn validate_password(password: &str) -> AppResult<()> {
    let length = password.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }
    if length > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at most {PASSWORD_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}
