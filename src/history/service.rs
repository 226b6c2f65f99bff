//! Medical history operations for Leclat.
//!
//! Staff create, edit and browse histories. A customer may read only the
//! history filed under their own national ID.

use tracing::info;

use super::repository::HistoryRepository;
use super::types::{MedicalHistory, MedicalHistoryUpdate, NewMedicalHistory};
use crate::auth::Caller;
use crate::db::{AccountRepository, Role};
use crate::{LeclatError, Result};

fn not_found() -> LeclatError {
    LeclatError::NotFound("history".to_string())
}

async fn ensure_account_exists(accounts: &AccountRepository<'_>, national_id: &str) -> Result<()> {
    if accounts.find_by_national_id(national_id).await?.is_none() {
        return Err(LeclatError::NotFound("account".to_string()));
    }
    Ok(())
}

/// File a new history (staff only). The national ID must belong to an account.
pub async fn create(
    repo: &HistoryRepository<'_>,
    accounts: &AccountRepository<'_>,
    caller: &Caller,
    new: NewMedicalHistory,
) -> Result<MedicalHistory> {
    caller.require(Role::Staff)?;
    let new = new.validated()?;
    ensure_account_exists(accounts, &new.national_id).await?;
    let history = repo.create(&new).await?;

    info!(history_id = history.id, by = caller.id, "Medical history created");
    Ok(history)
}

/// Edit a history (staff only). Moving it to another national ID requires
/// that account to exist.
pub async fn update(
    repo: &HistoryRepository<'_>,
    accounts: &AccountRepository<'_>,
    caller: &Caller,
    id: i64,
    update: MedicalHistoryUpdate,
) -> Result<MedicalHistory> {
    caller.require(Role::Staff)?;
    let update = update.validated()?;
    let current = repo.get_by_id(id).await?.ok_or_else(not_found)?;
    if let Some(ref national_id) = update.national_id {
        if *national_id != current.national_id {
            ensure_account_exists(accounts, national_id).await?;
        }
    }
    let history = repo.update(id, &update).await?.ok_or_else(not_found)?;

    info!(history_id = id, by = caller.id, "Medical history updated");
    Ok(history)
}

/// List every history (staff only).
pub async fn list(repo: &HistoryRepository<'_>, caller: &Caller) -> Result<Vec<MedicalHistory>> {
    caller.require(Role::Staff)?;
    repo.list().await
}

/// Get the history of a national ID. Customers may only read their own.
pub async fn get_by_national_id(
    repo: &HistoryRepository<'_>,
    accounts: &AccountRepository<'_>,
    caller: &Caller,
    national_id: &str,
) -> Result<MedicalHistory> {
    let national_id = national_id.trim();
    if !caller.role.can_access(Role::Staff) {
        let own = accounts
            .get_by_id(caller.id)
            .await?
            .is_some_and(|account| account.national_id == national_id);
        if !own {
            return Err(LeclatError::Forbidden(
                "staff access required for other histories".to_string(),
            ));
        }
    }
    repo.find_by_national_id(national_id)
        .await?
        .ok_or_else(not_found)
}
