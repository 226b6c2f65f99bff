//! Contact form handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::AppState;
use crate::contact::{self, ContactRepository};
use crate::web::dto::{ApiResponse, ContactRequest, ContactView, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/contact - Send a message.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message stored", body = ContactView),
        (status = 422, description = "Validation error")
    )
)]
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContactView>>), ApiError> {
    let repo = ContactRepository::new(state.db.pool());
    let message = contact::submit(&repo, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(message.into()))))
}

/// GET /api/contact - Read messages, newest first (staff).
#[utoipa::path(
    get,
    path = "/api/contact",
    tag = "contact",
    responses(
        (status = 200, description = "Messages", body = Vec<ContactView>),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_contact_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<ContactView>>>, ApiError> {
    let repo = ContactRepository::new(state.db.pool());
    let messages = contact::list(&repo, &user.caller()).await?;
    Ok(Json(ApiResponse::new(
        messages.into_iter().map(ContactView::from).collect(),
    )))
}
