//! Administrative account management.

use tracing::info;

use crate::auth::registration::create_from_request;
use crate::auth::validation::normalize_email;
use crate::auth::{Caller, RegistrationRequest};
use crate::db::{Account, AccountRepository, Role};
use crate::{LeclatError, Result};

/// Create an account with an explicit initial credential and any role.
pub async fn create_account(
    repo: &AccountRepository<'_>,
    caller: &Caller,
    request: RegistrationRequest,
) -> Result<Account> {
    caller.require(Role::Admin)?;

    let role = request.role.unwrap_or_default();
    let account = create_from_request(repo, request, role).await?;

    info!(
        account_id = account.id,
        role = %account.role,
        by = caller.id,
        "Account created by administrator"
    );
    Ok(account)
}

/// List accounts ordered by ID. Returns the page and the total count.
pub async fn list_accounts(
    repo: &AccountRepository<'_>,
    caller: &Caller,
    offset: i64,
    limit: i64,
) -> Result<(Vec<Account>, i64)> {
    caller.require(Role::Staff)?;

    let accounts = repo.list(offset, limit).await?;
    let total = repo.count().await?;
    Ok((accounts, total))
}

/// Find one account by national ID or email (national ID wins when both
/// are given).
pub async fn lookup_account(
    repo: &AccountRepository<'_>,
    caller: &Caller,
    national_id: Option<&str>,
    email: Option<&str>,
) -> Result<Account> {
    caller.require(Role::Staff)?;

    let national_id = national_id.map(str::trim).filter(|s| !s.is_empty());
    let email = email.map(normalize_email).filter(|s| !s.is_empty());

    let found = match (national_id, email) {
        (Some(national_id), _) => repo.find_by_national_id(national_id).await?,
        (None, Some(email)) => repo.find_by_email(&email).await?,
        (None, None) => {
            return Err(LeclatError::Validation(
                "national_id or email is required".to_string(),
            ))
        }
    };

    found.ok_or_else(|| LeclatError::NotFound("account".to_string()))
}

/// Fail with `Forbidden` when `caller` would disable its own account.
pub(crate) fn ensure_not_self_disable(caller: &Caller, id: i64, active: bool) -> Result<()> {
    if caller.id == id && !active {
        return Err(LeclatError::Forbidden(
            "cannot disable your own account".to_string(),
        ));
    }
    Ok(())
}

/// Enable or disable an account. An admin cannot disable themselves.
pub async fn set_account_active(
    repo: &AccountRepository<'_>,
    caller: &Caller,
    id: i64,
    active: bool,
) -> Result<Account> {
    caller.require(Role::Admin)?;
    ensure_not_self_disable(caller, id, active)?;

    if !repo.set_active(id, active).await? {
        return Err(LeclatError::NotFound("account".to_string()));
    }

    info!(account_id = id, active, by = caller.id, "Account status changed");

    repo.get_by_id(id)
        .await?
        .ok_or_else(|| LeclatError::NotFound("account".to_string()))
}
