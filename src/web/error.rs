//! API error handling for the Leclat HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::LeclatError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed request (400).
    BadRequest,
    /// National ID or email already in use (400).
    DuplicateIdentity,
    /// Reset token unknown or expired (400).
    InvalidOrExpiredToken,
    /// No bearer token (401).
    Unauthenticated,
    /// Bearer token past its lifetime (401).
    TokenExpired,
    /// Bearer token unreadable or badly signed (401).
    TokenMalformed,
    /// Wrong credential (401).
    InvalidCredential,
    /// Forbidden (403).
    Forbidden,
    /// Not found (404).
    NotFound,
    /// Conflict (409).
    Conflict,
    /// Validation error (422).
    ValidationError,
    /// Rate limit exceeded (429).
    TooManyRequests,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest
            | ErrorCode::DuplicateIdentity
            | ErrorCode::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthenticated
            | ErrorCode::TokenExpired
            | ErrorCode::TokenMalformed
            | ErrorCode::InvalidCredential => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Field-level validation error details (only present for validation errors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an unauthenticated error (missing bearer token).
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    /// Create a rate-limit error.
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TooManyRequests, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a validation error from validator::ValidationErrors.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            details.insert(field.to_string(), messages);
        }

        Self {
            code: ErrorCode::ValidationError,
            message: "Validation failed".to_string(),
            details: Some(details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<LeclatError> for ApiError {
    fn from(err: LeclatError) -> Self {
        let code = match &err {
            LeclatError::DuplicateIdentity => ErrorCode::DuplicateIdentity,
            LeclatError::NotFound(_) => ErrorCode::NotFound,
            LeclatError::InvalidCredential => ErrorCode::InvalidCredential,
            LeclatError::Forbidden(_) => ErrorCode::Forbidden,
            LeclatError::InvalidOrExpiredToken => ErrorCode::InvalidOrExpiredToken,
            LeclatError::TokenExpired => ErrorCode::TokenExpired,
            LeclatError::TokenMalformed => ErrorCode::TokenMalformed,
            LeclatError::Validation(_) => ErrorCode::ValidationError,
            LeclatError::Conflict(_) => ErrorCode::Conflict,
            LeclatError::StoreUnavailable(_)
            | LeclatError::Database(_)
            | LeclatError::Io(_)
            | LeclatError::Config(_)
            | LeclatError::Internal(_) => {
                tracing::error!("Internal error: {}", err);
                return ApiError::internal("An internal error occurred");
            }
        };
        ApiError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status() {
        assert_eq!(
            ErrorCode::DuplicateIdentity.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidOrExpiredToken.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::TokenExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenMalformed.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::ValidationError.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::TooManyRequests.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_leclat_error() {
        let cases = [
            (LeclatError::DuplicateIdentity, ErrorCode::DuplicateIdentity),
            (LeclatError::NotFound("account".into()), ErrorCode::NotFound),
            (LeclatError::InvalidCredential, ErrorCode::InvalidCredential),
            (LeclatError::Forbidden("no".into()), ErrorCode::Forbidden),
            (
                LeclatError::InvalidOrExpiredToken,
                ErrorCode::InvalidOrExpiredToken,
            ),
            (LeclatError::TokenExpired, ErrorCode::TokenExpired),
            (LeclatError::TokenMalformed, ErrorCode::TokenMalformed),
            (LeclatError::Validation("x".into()), ErrorCode::ValidationError),
            (LeclatError::Conflict("slot".into()), ErrorCode::Conflict),
            (
                LeclatError::StoreUnavailable("down".into()),
                ErrorCode::InternalError,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(ApiError::from(err).code(), code);
        }
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = ApiError::from(LeclatError::Database("near \"SELEC\": syntax error".into()));
        assert_eq!(err.message, "An internal error occurred");
    }

    #[test]
    fn test_error_code_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::InvalidOrExpiredToken).unwrap(),
            "\"INVALID_OR_EXPIRED_TOKEN\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::TokenExpired).unwrap(),
            "\"TOKEN_EXPIRED\""
        );
    }
}
