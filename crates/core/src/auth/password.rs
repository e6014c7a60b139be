//! Password hashing with Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use tally_shared::AppError;
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

    /// Password shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Minimum number of characters.
        min: usize,
    },
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort { .. } => Self::Validation(err.to_string()),
            PasswordError::HashError(_)
            | PasswordError::VerifyError(_)
            | PasswordError::InvalidHash => Self::Internal(err.to_string()),
        }
    }
}

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Checks a new password against the length rule.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` below [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hashes a password into a PHC string with a random salt.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC hash.
///
/// ```
/// use tally_core::auth::{hash_password, verify_password};
///
/// let hash = hash_password("correct horse").unwrap();
/// assert!(verify_password("correct horse", &hash).unwrap());
/// assert!(!verify_password("battery staple", &hash).unwrap());
/// ```
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` for a malformed hash and
/// `PasswordError::VerifyError` if verification fails unexpectedly.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hash = hash_password("monthly-bills").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("monthly-bills"));
    }

    #[test]
    fn test_verify_round_trip() {
        let hash = hash_password("monthly-bills").unwrap();
        assert!(verify_password("monthly-bills", &hash).unwrap());
        assert!(!verify_password("monthly-bill", &hash).unwrap());
    }

    #[test]
    fn test_salted() {
        assert_ne!(
            hash_password("same-password").unwrap(),
            hash_password("same-password").unwrap()
        );
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[rstest]
    #[case("", false)]
    #[case("1234567", false)]
    #[case("12345678", true)]
    #[case("senhaçõe", true)]
    fn test_validate_password_strength(#[case] password: &str, #[case] ok: bool) {
        assert_eq!(validate_password_strength(password).is_ok(), ok);
    }
}
