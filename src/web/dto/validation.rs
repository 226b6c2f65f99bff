//! Validated JSON extraction and custom field validators.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::web::error::ApiError;

/// JSON body extractor that runs `validator` rules after decoding.
///
/// A body that is not JSON, is missing required fields or carries unknown
/// ones is rejected with `BAD_REQUEST`; rule violations are rejected with
/// `VALIDATION_ERROR` and per-field details.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_api_error)?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_api_error(rejection: JsonRejection) -> ApiError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body".to_string(),
        other => format!("Invalid request body: {}", other.body_text()),
    };
    tracing::debug!(error = %rejection, "Rejected request body");
    ApiError::bad_request(message)
}

/// Reject control characters other than newline, carriage return and tab.
pub fn no_control_chars(value: &str) -> Result<(), ValidationError> {
    let bad = value
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'));
    if bad {
        return Err(ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into()));
    }
    Ok(())
}

/// Reject blank values.
pub fn not_empty_trimmed(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Must not be empty".into()));
    }
    Ok(())
}

/// Email check that ignores surrounding whitespace, which is trimmed later.
pub fn trimmed_email(value: &str) -> Result<(), ValidationError> {
    if !value.trim().validate_email() {
        return Err(ValidationError::new("email").with_message("Invalid email format".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_control_chars() {
        assert!(no_control_chars("Ana María").is_ok());
        assert!(no_control_chars("line\nbreak\ttab").is_ok());
        assert!(no_control_chars("nul\x00byte").is_err());
        assert!(no_control_chars("esc\x1b[0m").is_err());
    }

    #[test]
    fn test_trimmed_email() {
        assert!(trimmed_email("a@x.com").is_ok());
        assert!(trimmed_email("  a@x.com ").is_ok());
        assert!(trimmed_email("not-an-email").is_err());
        assert!(trimmed_email("   ").is_err());
    }

    #[test]
    fn test_not_empty_trimmed() {
        assert!(not_empty_trimmed("111").is_ok());
        assert!(not_empty_trimmed(" a ").is_ok());
        assert!(not_empty_trimmed("").is_err());
        assert!(not_empty_trimmed(" \t\n").is_err());
    }
}
