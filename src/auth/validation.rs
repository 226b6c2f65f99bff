//! Input validation for Leclat account data.
//!
//! Request DTOs carry `validator` rules for shape; the functions here are
//! the business rules every entry point (HTTP or library) goes through.

use thiserror::Error;
use validator::ValidateEmail;

use crate::LeclatError;

/// Maximum national ID length.
pub const MAX_NATIONAL_ID_LENGTH: usize = 20;

/// Maximum display name length.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Maximum phone length.
pub const MAX_PHONE_LENGTH: usize = 20;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// National ID is empty.
    #[error("national id cannot be empty")]
    NationalIdEmpty,

    /// National ID is too long.
    #[error("national id must be at most {MAX_NATIONAL_ID_LENGTH} characters")]
    NationalIdTooLong,

    /// National ID contains invalid characters.
    #[error("national id can only contain letters, digits and '-'")]
    NationalIdInvalidChars,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// National ID and email are the same value.
    #[error("national id and email must differ")]
    NationalIdSameAsEmail,

    /// Display name is empty.
    #[error("display name cannot be empty")]
    DisplayNameEmpty,

    /// Display name is too long.
    #[error("display name must be at most {MAX_DISPLAY_NAME_LENGTH} characters")]
    DisplayNameTooLong,

    /// Phone is too long.
    #[error("phone must be at most {MAX_PHONE_LENGTH} characters")]
    PhoneTooLong,
}

impl From<ValidationError> for LeclatError {
    fn from(e: ValidationError) -> Self {
        LeclatError::Validation(e.to_string())
    }
}

/// Trim and lower-case an email address.
///
/// ```
/// use leclat::auth::validation::normalize_email;
///
/// assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a national ID: 1-20 ASCII letters, digits or `-`.
pub fn validate_national_id(national_id: &str) -> Result<(), ValidationError> {
    if national_id.is_empty() {
        return Err(ValidationError::NationalIdEmpty);
    }
    if national_id.chars().count() > MAX_NATIONAL_ID_LENGTH {
        return Err(ValidationError::NationalIdTooLong);
    }
    if !national_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::NationalIdInvalidChars);
    }
    Ok(())
}

/// Validate an (already normalized) email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if !email.validate_email() {
        return Err(ValidationError::EmailInvalidFormat);
    }
    Ok(())
}

/// Validate a display name (already trimmed).
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::DisplayNameEmpty);
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(ValidationError::DisplayNameTooLong);
    }
    Ok(())
}

/// Validate a phone number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.chars().count() > MAX_PHONE_LENGTH {
        return Err(ValidationError::PhoneTooLong);
    }
    Ok(())
}

/// Validate all identity fields of a new account.
///
/// `email` must already be normalized.
pub fn validate_identity(
    national_id: &str,
    email: &str,
    display_name: &str,
    phone: Option<&str>,
) -> Result<(), ValidationError> {
    if national_id.eq_ignore_ascii_case(email) {
        return Err(ValidationError::NationalIdSameAsEmail);
    }
    validate_national_id(national_id)?;
    validate_email(email)?;
    validate_display_name(display_name)?;
    if let Some(phone) = phone {
        validate_phone(phone)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_id() {
        assert!(validate_national_id("111").is_ok());
        assert!(validate_national_id("1-234-567").is_ok());
        assert_eq!(validate_national_id(""), Err(ValidationError::NationalIdEmpty));
        assert_eq!(
            validate_national_id(&"9".repeat(21)),
            Err(ValidationError::NationalIdTooLong)
        );
        assert_eq!(
            validate_national_id("12 34"),
            Err(ValidationError::NationalIdInvalidChars)
        );
    }

    #[test]
    fn test_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert_eq!(validate_email("not-an-email"), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email(""), Err(ValidationError::EmailInvalidFormat));
        let long = format!("{}@x.com", "a".repeat(250));
        assert_eq!(validate_email(&long), Err(ValidationError::EmailTooLong));
    }

    #[test]
    fn test_display_name_and_phone() {
        assert!(validate_display_name("Ana").is_ok());
        assert_eq!(validate_display_name(""), Err(ValidationError::DisplayNameEmpty));
        assert_eq!(
            validate_display_name(&"x".repeat(101)),
            Err(ValidationError::DisplayNameTooLong)
        );
        assert!(validate_phone("+506 8888 8888").is_ok());
        assert_eq!(validate_phone(&"1".repeat(21)), Err(ValidationError::PhoneTooLong));
    }

    #[test]
    fn test_validate_identity() {
        assert!(validate_identity("111", "a@x.com", "Ana", None).is_ok());
        assert!(validate_identity("111", "a@x.com", "Ana", Some("555")).is_ok());
        assert_eq!(
            validate_identity("111", "a@x.com", "", None),
            Err(ValidationError::DisplayNameEmpty)
        );
        assert_eq!(
            validate_identity("a@x.com", "a@x.com", "Ana", None),
            Err(ValidationError::NationalIdSameAsEmail)
        );
    }

    #[test]
    fn test_into_leclat_error() {
        let err: LeclatError = ValidationError::EmailInvalidFormat.into();
        assert!(matches!(err, LeclatError::Validation(msg) if msg == "invalid email format"));
    }
}
