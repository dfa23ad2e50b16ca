//! Credential storage for registered users.
//!
//! Only Argon2id PHC strings are persisted in the user registry; plaintext never leaves this
//! module.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHash};
use thiserror::Error;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Password policy and hashing failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Fewer than [`MIN_PASSWORD_LENGTH`] characters.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Argon2 refused to hash.
    #[error("could not hash password: {0}")]
    HashError(String),

    /// Argon2 failed for a reason other than a mismatch.
    #[error("could not verify password: {0}")]
    VerifyError(String),

    /// The stored credential is not a PHC string.
    #[error("stored password hash is unreadable")]
    InvalidHash,
}

/// Rejects passwords shorter than [`MIN_PASSWORD_LENGTH`].
pub fn check_password_strength(password: &str) -> Result<(), PasswordError> {
    match password.chars().count() {
        n if n < MIN_PASSWORD_LENGTH => Err(PasswordError::TooShort),
        _ => Ok(()),
    }
}

/// Hashes `password` with a fresh random salt.
///
/// ```
/// let phc = coinkeeper_core::auth::hash_password("hunter22").unwrap();
/// assert!(phc.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(phc.to_string())
}

/// `Ok(false)` means a wrong password; errors are reserved for unusable stored hashes.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let phc = PasswordHash::new(stored).map_err(|_| PasswordError::InvalidHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &phc)
        .map(|()| true)
        .or_else(|e| match e {
            password_hash::Error::Password => Ok(false),
            other => Err(PasswordError::VerifyError(other.to_string())),
        })
}
