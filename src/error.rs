//! Error types for Leclat.

use thiserror::Error;

/// Common error type for Leclat.
#[derive(Error, Debug)]
pub enum LeclatError {
    /// National ID or email already belongs to another account.
    #[error("an account with this national id or email already exists")]
    DuplicateIdentity,

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Credential did not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredential,

    /// Caller is authenticated but lacks the rights for the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Password-reset token unknown or past its expiry.
    #[error("reset token is invalid or has expired")]
    InvalidOrExpiredToken,

    /// Bearer token signature is valid but its lifetime has elapsed.
    #[error("token expired")]
    TokenExpired,

    /// Bearer token could not be decoded or verified.
    #[error("token malformed")]
    TokenMalformed,

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Conflicting state (e.g. an appointment slot already taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure (hashing, token signing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for LeclatError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                LeclatError::DuplicateIdentity
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                LeclatError::StoreUnavailable(e.to_string())
            }
            _ => LeclatError::Database(e.to_string()),
        }
    }
}

/// Result type alias for Leclat operations.
pub type Result<T> = std::result::Result<T, LeclatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_display() {
        let err = LeclatError::NotFound("account".to_string());
        assert_eq!(err.to_string(), "account not found");
    }

    #[test]
    fn test_forbidden_error_display() {
        let err = LeclatError::Forbidden("admin access required".to_string());
        assert_eq!(err.to_string(), "forbidden: admin access required");
    }

    #[test]
    fn test_validation_error_display() {
        let err = LeclatError::Validation("email is invalid".to_string());
        assert_eq!(err.to_string(), "validation error: email is invalid");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LeclatError = io_err.into();
        assert!(matches!(err, LeclatError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_pool_closed_is_store_unavailable() {
        let err: LeclatError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, LeclatError::StoreUnavailable(_)));
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err: LeclatError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, LeclatError::Database(_)));
    }
}
