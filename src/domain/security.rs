use anyhow::Result;

/// Salted adaptive password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;

    /// Returns `Ok(false)` on mismatch and `Err` only when `hash` is not a
    /// hash this hasher understands.
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}
