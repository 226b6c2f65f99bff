//! Service status handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::StatusResponse;

/// GET /api/status - Process and store status.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "status",
    responses(
        (status = 200, description = "Service status", body = StatusResponse)
    )
)]
pub async fn api_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let database = if state.db.ping().await {
        "connected"
    } else {
        tracing::warn!("Status check: database unreachable");
        "disconnected"
    };

    Json(StatusResponse {
        status: "ok".to_string(),
        database: database.to_string(),
        environment: state.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
