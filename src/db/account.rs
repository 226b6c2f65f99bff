//! Account model for Leclat.
//!
//! This module defines the Account struct and Role enum stored in the
//! `usuarios` collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::auth::CredentialHash;

/// Account role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer = 0,
    /// Spa staff member.
    Staff = 1,
    /// Administrator.
    Admin = 2,
}

impl Role {
    /// Convert role to its stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Check if this role has at least the required permission level.
    ///
    /// # Examples
    ///
    /// ```
    /// use leclat::db::Role;
    ///
    /// assert!(Role::Admin.can_access(Role::Staff));
    /// assert!(Role::Staff.can_access(Role::Staff));
    /// assert!(!Role::Customer.can_access(Role::Staff));
    /// ```
    pub fn can_access(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" | "colaboradora" => Ok(Role::Staff),
            "customer" | "cliente" | "usuario" => Ok(Role::Customer),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// An active password-reset window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReset {
    /// SHA-256 hex digest of the issued token.
    pub token_digest: String,
    /// Expiry timestamp (UTC, storage format).
    pub expires_at: String,
}

/// Account entity.
#[derive(Debug, Clone)]
pub struct Account {
    /// System-assigned identifier.
    pub id: i64,
    /// National ID (unique, alternate login key).
    pub national_id: String,
    /// Email address (unique, lower-cased).
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Role for permissions.
    pub role: Role,
    /// Whether the account may log in.
    pub active: bool,
    /// Credential hash. Never leaves the server.
    pub password_hash: CredentialHash,
    /// Password reset in progress, if any.
    pub pending_reset: Option<PendingReset>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl Account {
    /// Check if this account has at least the required role level.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.can_access(required)
    }

    /// Check if this account is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl<'r> FromRow<'r, SqliteRow> for Account {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role.parse::<Role>().map_err(|e| sqlx::Error::Decode(e.into()))?;

        let token: Option<String> = row.try_get("reset_token")?;
        let expiry: Option<String> = row.try_get("reset_token_expiry")?;
        let pending_reset = match (token, expiry) {
            (Some(token_digest), Some(expires_at)) => Some(PendingReset {
                token_digest,
                expires_at,
            }),
            (None, None) => None,
            _ => return Err(sqlx::Error::Decode("reset token fields out of sync".into())),
        };

        Ok(Self {
            id: row.try_get("id")?,
            national_id: row.try_get("national_id")?,
            email: row.try_get("email")?,
            display_name: row.try_get("display_name")?,
            phone: row.try_get("phone")?,
            role,
            active: row.try_get("active")?,
            password_hash: CredentialHash::from_stored(row.try_get("password_hash")?),
            pending_reset,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// National ID.
    pub national_id: String,
    /// Email address (already normalized).
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Role (defaults to Customer).
    pub role: Role,
    /// Hashed credential.
    pub password_hash: CredentialHash,
}

impl NewAccount {
    /// Create a new customer account record.
    pub fn new(
        national_id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        password_hash: CredentialHash,
    ) -> Self {
        Self {
            national_id: national_id.into(),
            email: email.into(),
            display_name: display_name.into(),
            phone: None,
            role: Role::Customer,
            password_hash,
        }
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Data for updating an existing account.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    /// New display name.
    pub display_name: Option<String>,
    /// New email (normalized).
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New credential hash.
    pub password_hash: Option<CredentialHash>,
    /// New role.
    pub role: Option<Role>,
    /// New active status.
    pub active: Option<bool>,
}

impl AccountUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new display name.
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set new email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set new phone number.
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Replace the credential.
    pub fn password_hash(mut self, hash: CredentialHash) -> Self {
        self.password_hash = Some(hash);
        self
    }

    /// Set new role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set new active status.
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Check if the update carries no changes.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.active.is_none()
    }
}
