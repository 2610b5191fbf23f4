//! Password hashing helpers.
//!
//! Thin wrappers over argon2 with its default (deliberately expensive)
//! parameters. Hashes are PHC strings carrying their own salt and cost.

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use rand::rngs::OsRng;

use crate::errors::{Error, Result};

/// One-way, salted hash of a plaintext password.
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Unexpected(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext against a stored hash. A mismatch is `Ok(false)`,
/// never an error; only a malformed hash fails.
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|_| Error::InvalidCredentials)?;
    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(Error::Unexpected(format!(
            "Password verification failed: {e}"
        ))),
    }
}
