//! Account management handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::auth::{self, admin};
use crate::db::AccountRepository;
use crate::web::dto::{
    AccountView, ApiResponse, CreateAccountRequest, LookupQuery, PaginatedResponse,
    PaginationQuery, SetStatusRequest, UpdateAccountRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/accounts - Create an account (admin).
#[utoipa::path(
    post,
    path = "/api/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountView),
        (status = 400, description = "National ID or email already in use"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountView>>), ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let account = admin::create_account(&repo, &user.caller(), req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(account.into()))))
}

/// GET /api/accounts - List accounts (staff).
#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "accounts",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of accounts", body = Vec<AccountView>),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<AccountView>>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let (offset, limit) = pagination.to_offset_limit();
    let (page, per_page) = pagination.normalized();

    let (accounts, total) = admin::list_accounts(&repo, &user.caller(), offset, limit).await?;

    Ok(Json(PaginatedResponse::new(
        accounts.into_iter().map(AccountView::from).collect(),
        page,
        per_page,
        total.max(0) as u64,
    )))
}

/// GET /api/accounts/lookup - Find an account by national ID or email (staff).
#[utoipa::path(
    get,
    path = "/api/accounts/lookup",
    tag = "accounts",
    params(LookupQuery),
    responses(
        (status = 200, description = "Matching account", body = AccountView),
        (status = 400, description = "Neither national_id nor email given"),
        (status = 404, description = "No match")
    ),
    security(("bearer_auth" = []))
)]
pub async fn lookup_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let given = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !given(&query.national_id) && !given(&query.email) {
        return Err(ApiError::bad_request("national_id or email is required"));
    }

    let repo = AccountRepository::new(state.db.pool());
    let account = admin::lookup_account(
        &repo,
        &user.caller(),
        query.national_id.as_deref(),
        query.email.as_deref(),
    )
    .await?;
    Ok(Json(ApiResponse::new(account.into())))
}

/// PUT /api/accounts/:id - Update an account (self or admin).
#[utoipa::path(
    put,
    path = "/api/accounts/{id}",
    tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountView),
        (status = 400, description = "Email already in use"),
        (status = 403, description = "Not allowed to modify this account"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let account = auth::update_profile(&repo, &user.caller(), id, req.into()).await?;
    Ok(Json(ApiResponse::new(account.into())))
}

/// PUT /api/accounts/:id/status - Enable or disable an account (admin).
#[utoipa::path(
    put,
    path = "/api/accounts/{id}/status",
    tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountView),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_account_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<SetStatusRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let account = admin::set_account_active(&repo, &user.caller(), id, req.active).await?;
    Ok(Json(ApiResponse::new(account.into())))
}
