use kanso_core::AppResult;

/// Port for the adaptive, memory/CPU-hard password hashing function the
/// spec assumes but leaves unconstrained (§1). Hashing and verification are
/// synchronous/CPU-bound, matching how the concrete argon2id implementation
/// runs them.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password, embedding a fresh per-hash salt.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash. Returns `Ok(false)`
    /// for a simple mismatch, `Err` only for a malformed/corrupt hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
