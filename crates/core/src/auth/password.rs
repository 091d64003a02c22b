//! Password hashing with Argon2id.
//!
//! Argon2id with the crate defaults; hashes are stored as PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password does not meet the minimum length.
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

/// Minimum password length accepted when creating users.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Checks a new password against the account policy.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` if the password has fewer than
/// `MIN_PASSWORD_LENGTH` characters.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hashes a password using Argon2id with a random salt.
///
/// The result is a PHC string (`$argon2id$...`) stored in `users.password_hash`.
///
/// ```
/// use amanat_core::auth::hash_password;
///
/// let hash = hash_password("sekretariat-2026").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only a malformed hash or an internal
/// failure is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("rahasia-ketua").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("rahasia-ketua", &hash).unwrap());
        assert!(!verify_password("rahasia-admin", &hash).unwrap());
    }

    #[test]
    fn test_salt_is_random() {
        assert_ne!(
            hash_password("sama-saja").unwrap(),
            hash_password("sama-saja").unwrap()
        );
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("rahasia123").is_ok());
        assert!(matches!(
            validate_password_strength("pendek"),
            Err(PasswordError::TooShort { min: 8 })
        ));
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("apa saja", "bukan-hash"),
            Err(PasswordError::InvalidHash)
        ));
    }
}
