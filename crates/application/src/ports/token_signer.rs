use kanso_core::AppResult;
use kanso_domain::UserId;

/// Port for minting and verifying the signature/issuer/expiry parts of the
/// bearer-token contract (§4.1). Liveness (does `sub` resolve to a live
/// user?) is layered on top by `TokenService`, which also holds the user
/// repository this port does not need to know about.
pub trait TokenSigner: Send + Sync {
    /// Mints a token embedding `{sub: user_id, iss, iat, exp}`.
    fn sign(&self, user_id: UserId) -> AppResult<String>;

    /// Verifies signature, algorithm family, issuer, and expiry, returning
    /// the subject's user id on success. Any failure — bad signature, wrong
    /// algorithm, wrong issuer, or expiry — is reported identically as
    /// `Unauthenticated` so callers cannot distinguish the failure mode.
    fn verify(&self, token: &str) -> AppResult<UserId>;
}
