//! Credential hashing and validation for Leclat.
//!
//! Uses Argon2id for salted one-way hashing. The only way to obtain a
//! [`CredentialHash`] outside this crate is [`hash_password`], so account
//! records can never carry a plaintext.

use std::fmt;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

use crate::LeclatError;

/// Minimum credential length (in characters).
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum credential length (in characters).
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Credential-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Credential is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Credential is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// Hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),
}

impl From<PasswordError> for LeclatError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::HashError(msg) => LeclatError::Internal(msg),
            other => LeclatError::Validation(other.to_string()),
        }
    }
}

/// A salted Argon2id hash in PHC string form.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a hash loaded from storage.
    pub(crate) fn from_stored(phc: String) -> Self {
        Self(phc)
    }

    /// The PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check `password` against this hash.
    pub fn verify(&self, password: &str) -> bool {
        verify_password(password, self)
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(**redacted**)")
    }
}

/// Argon2id with the library's default cost (19 MiB, 2 passes, 1 lane).
fn create_argon2() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT)
}

/// Hash a credential using Argon2id.
///
/// # Examples
///
/// ```
/// use leclat::auth::hash_password;
///
/// let hash = hash_password("secret1").unwrap();
/// assert!(hash.as_str().starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<CredentialHash, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(CredentialHash(hash.to_string()))
}

/// Verify a credential against a stored hash.
///
/// An unparseable stored hash never verifies.
pub fn verify_password(password: &str, hash: &CredentialHash) -> bool {
    let Ok(parsed) = PasswordHash::new(hash.as_str()) else {
        return false;
    };
    // Parameters come from the PHC string, not from create_argon2().
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Validate credential length requirements.
///
/// ```
/// use leclat::auth::validate_password;
///
/// assert!(validate_password("short").is_err());
/// assert!(validate_password("secret1").is_ok());
/// ```
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}
