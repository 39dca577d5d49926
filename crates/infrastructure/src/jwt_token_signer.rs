//! JWT-based bearer token signer.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use kanso_application::TokenSigner;
use kanso_core::{AppError, AppResult};
use kanso_domain::UserId;

/// The token's payload: subject, issuer, issued-at, and expiry. No
/// audience, refresh-token rotation, or blacklisting — the token carries
/// exactly what §4.1 requires and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: uuid::Uuid,
    iss: String,
    iat: i64,
    exp: i64,
}

/// HS256 JWT implementation of the token signer port.
pub struct JwtTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_seconds: i64,
}

impl JwtTokenSigner {
    /// Creates a signer from a shared secret, issuer string, and token
    /// lifetime in seconds.
    #[must_use]
    pub fn new(secret: &str, issuer: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            ttl_seconds,
        }
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, user_id: UserId) -> AppResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.as_uuid(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign token: {error}")))
    }

    fn verify(&self, token: &str) -> AppResult<UserId> {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_issuer(&[self.issuer.clone()]);
        validation.set_required_spec_claims(&["sub", "iss", "exp"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthenticated("invalid or expired".to_owned()))?;

        Ok(UserId::from_uuid(data.claims.sub))
    }
}
