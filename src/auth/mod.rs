//! Authentication module for Leclat.
//!
//! This module provides credential hashing, bearer tokens, registration,
//! login, password reset and account management.

pub mod admin;
mod login;
mod password;
mod profile;
mod registration;
pub mod reset;
mod token;
pub mod validation;

pub use login::{login, Authenticated};
pub use password::{
    hash_password, validate_password, verify_password, CredentialHash, PasswordError,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use profile::{get_profile, update_profile, ProfileUpdate};
pub use registration::{register, RegistrationRequest};
pub use token::{Claims, TokenError, TokenIssuer, TokenSubject};
pub use validation::ValidationError;

use crate::db::Role;
use crate::{LeclatError, Result};

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Account ID.
    pub id: i64,
    /// Role claimed by the token.
    pub role: Role,
}

impl Caller {
    /// Create a caller.
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// Check if the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `Forbidden` unless the caller holds at least `required`.
    pub fn require(&self, required: Role) -> Result<()> {
        if self.role.can_access(required) {
            Ok(())
        } else {
            Err(LeclatError::Forbidden(format!("{required} access required")))
        }
    }
}

impl From<&Claims> for Caller {
    fn from(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_require() {
        let staff = Caller::new(1, Role::Staff);
        assert!(staff.require(Role::Customer).is_ok());
        assert!(staff.require(Role::Staff).is_ok());
        let err = staff.require(Role::Admin).unwrap_err();
        assert_eq!(err.to_string(), "forbidden: admin access required");
        assert!(!staff.is_admin());
        assert!(Caller::new(2, Role::Admin).is_admin());
    }
}
