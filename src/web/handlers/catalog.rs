//! Service catalog handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::catalog::{service, ServiceRepository};
use crate::web::dto::{
    ApiResponse, CreateServiceRequest, ServiceListQuery, ServiceView, UpdateServiceRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, OptionalAuthUser};

/// POST /api/services - Add a service to the catalog (staff).
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ServiceView),
        (status = 403, description = "Staff access required"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceView>>), ApiError> {
    let repo = ServiceRepository::new(state.db.pool());
    let created = service::create(&repo, &user.caller(), req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(created.into()))))
}

/// GET /api/services - Browse the catalog.
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "services",
    params(ServiceListQuery),
    responses(
        (status = 200, description = "Services", body = Vec<ServiceView>),
        (status = 403, description = "Inactive services require staff access")
    )
)]
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    user: OptionalAuthUser,
    Query(query): Query<ServiceListQuery>,
) -> Result<Json<ApiResponse<Vec<ServiceView>>>, ApiError> {
    let repo = ServiceRepository::new(state.db.pool());
    let caller = user.caller();
    let services = service::list(&repo, caller.as_ref(), query.into()).await?;
    Ok(Json(ApiResponse::new(
        services.into_iter().map(ServiceView::from).collect(),
    )))
}

/// GET /api/services/:id - Get one service.
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ServiceView),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    user: OptionalAuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ServiceView>>, ApiError> {
    let repo = ServiceRepository::new(state.db.pool());
    let caller = user.caller();
    let found = service::get(&repo, caller.as_ref(), id).await?;
    Ok(Json(ApiResponse::new(found.into())))
}

/// PUT /api/services/:id - Edit a service (staff).
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = i64, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ServiceView),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Service not found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<ServiceView>>, ApiError> {
    let repo = ServiceRepository::new(state.db.pool());
    let updated = service::update(&repo, &user.caller(), id, req.into()).await?;
    Ok(Json(ApiResponse::new(updated.into())))
}

/// DELETE /api/services/:id - Withdraw a service (staff).
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service withdrawn", body = ServiceView),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Service not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ServiceView>>, ApiError> {
    let repo = ServiceRepository::new(state.db.pool());
    let removed = service::remove(&repo, &user.caller(), id).await?;
    Ok(Json(ApiResponse::new(removed.into())))
}
