//! Service catalog operations for Leclat.
//!
//! Anyone may browse active services. Staff manage the catalog and are the
//! only callers who see withdrawn entries.

use tracing::info;

use super::repository::ServiceRepository;
use super::types::{NewSpaService, ServiceFilter, SpaService, SpaServiceUpdate};
use crate::auth::Caller;
use crate::db::Role;
use crate::{LeclatError, Result};

fn not_found() -> LeclatError {
    LeclatError::NotFound("service".to_string())
}

fn is_staff(caller: Option<&Caller>) -> bool {
    caller.is_some_and(|c| c.role.can_access(Role::Staff))
}

/// Add a service to the catalog (staff only).
pub async fn create(
    repo: &ServiceRepository<'_>,
    caller: &Caller,
    new: NewSpaService,
) -> Result<SpaService> {
    caller.require(Role::Staff)?;
    let service = repo.create(&new.validated()?).await?;

    info!(service_id = service.id, code = %service.code, by = caller.id, "Service created");
    Ok(service)
}

/// List services. Without an `active` filter only active entries are shown.
pub async fn list(
    repo: &ServiceRepository<'_>,
    caller: Option<&Caller>,
    mut filter: ServiceFilter,
) -> Result<Vec<SpaService>> {
    match filter.active {
        None => filter.active = Some(true),
        Some(false) if !is_staff(caller) => {
            return Err(LeclatError::Forbidden(
                "staff access required for inactive services".to_string(),
            ));
        }
        Some(_) => {}
    }
    filter.category = filter
        .category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());
    repo.list(&filter).await
}

/// Get one service. Inactive entries are hidden from non-staff callers.
pub async fn get(
    repo: &ServiceRepository<'_>,
    caller: Option<&Caller>,
    id: i64,
) -> Result<SpaService> {
    let service = repo.get_by_id(id).await?.ok_or_else(not_found)?;
    if !service.active && !is_staff(caller) {
        return Err(not_found());
    }
    Ok(service)
}

/// Edit a service (staff only).
pub async fn update(
    repo: &ServiceRepository<'_>,
    caller: &Caller,
    id: i64,
    update: SpaServiceUpdate,
) -> Result<SpaService> {
    caller.require(Role::Staff)?;
    let update = update.validated()?;
    let service = repo.update(id, &update).await?.ok_or_else(not_found)?;

    info!(service_id = id, by = caller.id, "Service updated");
    Ok(service)
}

/// Withdraw a service from the catalog (staff only). The row is kept.
pub async fn remove(repo: &ServiceRepository<'_>, caller: &Caller, id: i64) -> Result<SpaService> {
    caller.require(Role::Staff)?;
    let service = repo.set_active(id, false).await?.ok_or_else(not_found)?;

    info!(service_id = id, by = caller.id, "Service withdrawn");
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn hydrafacial() -> NewSpaService {
        NewSpaService::new("Hydrafacial", "/img/h.png", 120.0, "Deep clean", "60 min")
            .with_category("Facial")
    }

    #[tokio::test]
    async fn test_create_requires_staff() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = ServiceRepository::new(db.pool());
        let customer = Caller::new(1, Role::Customer);
        let staff = Caller::new(2, Role::Staff);

        assert!(matches!(
            create(&repo, &customer, hydrafacial()).await,
            Err(LeclatError::Forbidden(_))
        ));
        let created = create(&repo, &staff, hydrafacial()).await.unwrap();
        assert_eq!(created.category, "facial");

        let bad = NewSpaService::new("Free", "/img/f.png", -5.0, "Nope", "1 min");
        assert!(matches!(
            create(&repo, &staff, bad).await,
            Err(LeclatError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_removed_service_hidden_from_public() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = ServiceRepository::new(db.pool());
        let staff = Caller::new(2, Role::Staff);
        let customer = Caller::new(1, Role::Customer);

        let kept = create(&repo, &staff, hydrafacial()).await.unwrap();
        let gone = create(&repo, &staff, hydrafacial()).await.unwrap();
        assert!(!remove(&repo, &staff, gone.id).await.unwrap().active);

        let public = list(&repo, None, ServiceFilter::default()).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, kept.id);

        assert!(matches!(
            get(&repo, Some(&customer), gone.id).await,
            Err(LeclatError::NotFound(_))
        ));
        assert!(!get(&repo, Some(&staff), gone.id).await.unwrap().active);

        let inactive = ServiceFilter {
            active: Some(false),
            ..Default::default()
        };
        assert!(matches!(
            list(&repo, None, inactive.clone()).await,
            Err(LeclatError::Forbidden(_))
        ));
        assert_eq!(list(&repo, Some(&staff), inactive).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_remove_require_staff() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = ServiceRepository::new(db.pool());
        let staff = Caller::new(2, Role::Staff);
        let customer = Caller::new(1, Role::Customer);
        let created = create(&repo, &staff, hydrafacial()).await.unwrap();

        let change = SpaServiceUpdate {
            price: Some(99.0),
            ..Default::default()
        };
        assert!(matches!(
            update(&repo, &customer, created.id, change.clone()).await,
            Err(LeclatError::Forbidden(_))
        ));
        assert_eq!(
            update(&repo, &staff, created.id, change.clone()).await.unwrap().price,
            99.0
        );
        assert!(matches!(
            update(&repo, &staff, 999, change).await,
            Err(LeclatError::NotFound(_))
        ));

        assert!(matches!(
            remove(&repo, &customer, created.id).await,
            Err(LeclatError::Forbidden(_))
        ));
        assert!(matches!(
            remove(&repo, &staff, 999).await,
            Err(LeclatError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = ServiceRepository::new(db.pool());
        let staff = Caller::new(2, Role::Staff);
        create(&repo, &staff, hydrafacial()).await.unwrap();
        create(
            &repo,
            &staff,
            NewSpaService::new("Wrap", "/img/w.png", 60.0, "Body wrap", "45 min"),
        )
        .await
        .unwrap();

        let facial = ServiceFilter {
            category: Some("FACIAL".to_string()),
            ..Default::default()
        };
        let found = list(&repo, None, facial).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Hydrafacial");

        let other = ServiceFilter {
            category: Some("other".to_string()),
            ..Default::default()
        };
        assert_eq!(list(&repo, None, other).await.unwrap()[0].name, "Wrap");
    }
}
