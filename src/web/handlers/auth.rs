//! Authentication handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::auth::{self, reset};
use crate::db::AccountRepository;
use crate::web::dto::{
    AccountView, ApiResponse, AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest, ValidTokenResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, OptionalAuthUser};
use crate::LeclatError;

/// Body returned by `/forgot-password` whether or not an account matched.
pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account matches, password reset instructions have been issued.";

/// POST /api/register - Create an account and log it in.
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "National ID or email already in use"),
        (status = 403, description = "Role assignment requires an administrator"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    auth_user: OptionalAuthUser,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let caller = auth_user.caller();

    let authenticated = auth::register(&repo, &state.issuer, req.into(), caller.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(authenticated.into())),
    ))
}

/// POST /api/login - Log in with a national ID or email.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "No active account matches the identifier"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let authenticated = auth::login(&repo, &state.issuer, &req.identifier, &req.credential).await?;
    Ok(Json(ApiResponse::new(authenticated.into())))
}

/// POST /api/forgot-password - Start a password reset.
///
/// The response is identical whether or not the identifier matched.
#[utoipa::path(
    post,
    path = "/api/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Generic acknowledgement", body = MessageResponse),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let issued = reset::request_password_reset(
        &repo,
        &req.identifier,
        state.reset_token_ttl,
        chrono::Utc::now(),
    )
    .await?;

    if let Some(issued) = issued {
        if state.log_reset_tokens {
            tracing::info!(
                account_id = issued.account_id,
                reset_token = %issued.token,
                expires_at = %issued.expires_at,
                "Reset token issued (diagnostic logging enabled)"
            );
        }
    }

    Ok(Json(ApiResponse::new(MessageResponse::new(
        RESET_REQUESTED_MESSAGE,
    ))))
}

/// GET /api/validate-token/:token - Check a reset token.
#[utoipa::path(
    get,
    path = "/api/validate-token/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Reset token")),
    responses(
        (status = 200, description = "Whether the token is usable", body = ValidTokenResponse)
    )
)]
pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<ValidTokenResponse>>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let valid = match reset::validate_reset_token(&repo, &token, chrono::Utc::now()).await {
        Ok(()) => true,
        Err(LeclatError::InvalidOrExpiredToken) => false,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(ApiResponse::new(ValidTokenResponse { valid })))
}

/// POST /api/reset-password/:token - Set a new credential with a reset token.
#[utoipa::path(
    post,
    path = "/api/reset-password/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Reset token")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Credential replaced", body = MessageResponse),
        (status = 400, description = "Token invalid or expired")
    )
)]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    reset::complete_reset(&repo, &token, &req.new_credential, chrono::Utc::now()).await?;
    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Password has been reset",
    ))))
}

/// GET /api/profile - Current account.
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "auth",
    responses(
        (status = 200, description = "Current account", body = AccountView),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Account disabled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let repo = AccountRepository::new(state.db.pool());
    let account = auth::get_profile(&repo, &user.caller()).await?;
    Ok(Json(ApiResponse::new(account.into())))
}
