//! Account profile management for Leclat.
//!
//! Profile reads and updates load the account from storage, so unlike the
//! request gate they see the current `active` flag.

use tracing::info;

use crate::auth::validation::{
    normalize_email, validate_display_name, validate_email, validate_phone,
};
use crate::auth::admin::ensure_not_self_disable;
use crate::auth::{hash_password, Caller};
use crate::db::{Account, AccountRepository, AccountUpdate, Role};
use crate::{LeclatError, Result};

/// Fields a profile update may carry. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name.
    pub display_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New plaintext credential.
    pub credential: Option<String>,
    /// New role (admin only).
    pub role: Option<Role>,
    /// New active flag (admin only).
    pub active: Option<bool>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Load the caller's own account.
pub async fn get_profile(repo: &AccountRepository<'_>, caller: &Caller) -> Result<Account> {
    let account = repo
        .get_by_id(caller.id)
        .await?
        .ok_or_else(|| LeclatError::NotFound("account".to_string()))?;

    if !account.active {
        return Err(LeclatError::Forbidden("account is disabled".to_string()));
    }
    Ok(account)
}

/// Update the account `target_id` on behalf of `caller`.
///
/// The caller must be the target or an admin; `role` and `active` need an
/// admin. A new credential is re-hashed, a new email is re-checked for
/// uniqueness.
pub async fn update_profile(
    repo: &AccountRepository<'_>,
    caller: &Caller,
    target_id: i64,
    update: ProfileUpdate,
) -> Result<Account> {
    if caller.id != target_id && !caller.is_admin() {
        return Err(LeclatError::Forbidden(
            "cannot modify another account".to_string(),
        ));
    }
    if (update.role.is_some() || update.active.is_some()) && !caller.is_admin() {
        return Err(LeclatError::Forbidden(
            "only an administrator can change role or status".to_string(),
        ));
    }

    if let Some(active) = update.active {
        ensure_not_self_disable(caller, target_id, active)?;
    }

    let current = repo
        .get_by_id(target_id)
        .await?
        .ok_or_else(|| LeclatError::NotFound("account".to_string()))?;
    if !current.active && !caller.is_admin() {
        return Err(LeclatError::Forbidden("account is disabled".to_string()));
    }

    let mut changes = AccountUpdate::new();

    if let Some(display_name) = non_empty(update.display_name) {
        validate_display_name(&display_name)?;
        changes = changes.display_name(display_name);
    }
    if let Some(phone) = non_empty(update.phone) {
        validate_phone(&phone)?;
        changes = changes.phone(phone);
    }
    if let Some(email) = non_empty(update.email) {
        let email = normalize_email(&email);
        if email != current.email {
            validate_email(&email)?;
            if repo.email_taken_by_other(&email, target_id).await? {
                return Err(LeclatError::DuplicateIdentity);
            }
            changes = changes.email(email);
        }
    }
    if let Some(credential) = update.credential.filter(|c| !c.is_empty()) {
        changes = changes.password_hash(hash_password(&credential)?);
    }
    if let Some(role) = update.role {
        changes = changes.role(role);
    }
    if let Some(active) = update.active {
        changes = changes.active(active);
    }

    let account = repo
        .update(target_id, &changes)
        .await?
        .ok_or_else(|| LeclatError::NotFound("account".to_string()))?;

    info!(
        account_id = target_id,
        by = caller.id,
        credential_changed = changes.password_hash.is_some(),
        "Account updated"
    );
    Ok(account)
}
