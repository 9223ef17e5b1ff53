use crate::domain::error::DomainError;
use crate::domain::security::PasswordHasher;
use anyhow::{Context, Result};

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const PASSWORD_TOO_LONG: &str = "Password must be at most 72 bytes";

/// bcrypt with a random salt per hash. Hashes use the `$2b$` format, so rows
/// written by other bcrypt implementations verify as well.
///
/// Input is never truncated: hashing a password longer than
/// [`MAX_PASSWORD_BYTES`] is a validation error, and such a password never
/// verifies.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// `cost` is the log2 work factor, 4..=31.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(DomainError::Validation(PASSWORD_TOO_LONG.to_string()).into());
        }
        bcrypt::non_truncating_hash(password, self.cost).context("bcrypt hashing failed")
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        bcrypt::non_truncating_verify(password, hash)
            .context("stored password hash is not a valid bcrypt hash")
    }
}
