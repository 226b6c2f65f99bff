//! Medical history handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::db::AccountRepository;
use crate::history::{service, HistoryRepository};
use crate::web::dto::{
    ApiResponse, CreateHistoryRequest, HistoryView, UpdateHistoryRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/histories - File a medical history (staff).
#[utoipa::path(
    post,
    path = "/api/histories",
    tag = "histories",
    request_body = CreateHistoryRequest,
    responses(
        (status = 201, description = "History created", body = HistoryView),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "No account with that national ID"),
        (status = 409, description = "A history already exists for that national ID"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateHistoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<HistoryView>>), ApiError> {
    let repo = HistoryRepository::new(state.db.pool());
    let accounts = AccountRepository::new(state.db.pool());
    let history = service::create(&repo, &accounts, &user.caller(), req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(history.into()))))
}

/// GET /api/histories - List medical histories (staff).
#[utoipa::path(
    get,
    path = "/api/histories",
    tag = "histories",
    responses(
        (status = 200, description = "Histories", body = Vec<HistoryView>),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_histories(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<HistoryView>>>, ApiError> {
    let repo = HistoryRepository::new(state.db.pool());
    let histories = service::list(&repo, &user.caller()).await?;
    Ok(Json(ApiResponse::new(
        histories.into_iter().map(HistoryView::from).collect(),
    )))
}

/// GET /api/histories/national-id/:national_id - History of one client.
#[utoipa::path(
    get,
    path = "/api/histories/national-id/{national_id}",
    tag = "histories",
    params(("national_id" = String, Path, description = "Client national ID")),
    responses(
        (status = 200, description = "History", body = HistoryView),
        (status = 403, description = "Not your history"),
        (status = 404, description = "History not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(national_id): Path<String>,
) -> Result<Json<ApiResponse<HistoryView>>, ApiError> {
    let repo = HistoryRepository::new(state.db.pool());
    let accounts = AccountRepository::new(state.db.pool());
    let history = service::get_by_national_id(&repo, &accounts, &user.caller(), &national_id).await?;
    Ok(Json(ApiResponse::new(history.into())))
}

/// PUT /api/histories/:id - Edit a medical history (staff).
#[utoipa::path(
    put,
    path = "/api/histories/{id}",
    tag = "histories",
    params(("id" = i64, Path, description = "History ID")),
    request_body = UpdateHistoryRequest,
    responses(
        (status = 200, description = "History updated", body = HistoryView),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "History or account not found"),
        (status = 409, description = "A history already exists for that national ID"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateHistoryRequest>,
) -> Result<Json<ApiResponse<HistoryView>>, ApiError> {
    let repo = HistoryRepository::new(state.db.pool());
    let accounts = AccountRepository::new(state.db.pool());
    let history = service::update(&repo, &accounts, &user.caller(), id, req.into()).await?;
    Ok(Json(ApiResponse::new(history.into())))
}
