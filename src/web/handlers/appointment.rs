//! Appointment handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::appointment::{service, AppointmentRepository, AppointmentStatus};
use crate::web::dto::{
    ApiResponse, AppointmentListQuery, AppointmentView, AvailabilityQuery, AvailabilityResponse,
    CreateAppointmentRequest, ExistsResponse, SlotQuery, UpdateAppointmentRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/appointments - Book an appointment.
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentView),
        (status = 409, description = "Time slot already booked"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentView>>), ApiError> {
    let repo = AppointmentRepository::new(state.db.pool());
    let appointment = service::book(&repo, &user.caller(), req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(appointment.into())),
    ))
}

/// GET /api/appointments - List appointments (own for customers, all for staff).
#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "appointments",
    params(AppointmentListQuery),
    responses(
        (status = 200, description = "Appointments", body = Vec<AppointmentView>),
        (status = 400, description = "Unknown status filter")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, ApiError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(s.parse::<AppointmentStatus>().map_err(ApiError::bad_request)?),
    };

    let repo = AppointmentRepository::new(state.db.pool());
    let appointments = service::list(&repo, &user.caller(), status).await?;
    Ok(Json(ApiResponse::new(
        appointments.into_iter().map(AppointmentView::from).collect(),
    )))
}

/// GET /api/appointments/availability - Times already taken on a date.
#[utoipa::path(
    get,
    path = "/api/appointments/availability",
    tag = "appointments",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Taken times", body = AvailabilityResponse),
        (status = 422, description = "Invalid date")
    )
)]
pub async fn availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, ApiError> {
    let repo = AppointmentRepository::new(state.db.pool());
    let (date, taken_times) = service::availability(&repo, &query.date).await?;
    Ok(Json(ApiResponse::new(AvailabilityResponse {
        date,
        taken_times,
    })))
}

/// GET /api/appointments/exists - Whether a slot is booked.
#[utoipa::path(
    get,
    path = "/api/appointments/exists",
    tag = "appointments",
    params(SlotQuery),
    responses(
        (status = 200, description = "Slot state", body = ExistsResponse),
        (status = 422, description = "Invalid date or time")
    )
)]
pub async fn slot_exists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<ApiResponse<ExistsResponse>>, ApiError> {
    let repo = AppointmentRepository::new(state.db.pool());
    let exists = service::exists(&repo, &query.date, &query.time).await?;
    Ok(Json(ApiResponse::new(ExistsResponse { exists })))
}

/// PUT /api/appointments/:id - Edit an appointment (staff).
#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "appointments",
    params(("id" = i64, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Updated appointment", body = AppointmentView),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Time slot already booked")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentView>>, ApiError> {
    let repo = AppointmentRepository::new(state.db.pool());
    let appointment = service::update(&repo, &user.caller(), id, req.into()).await?;
    Ok(Json(ApiResponse::new(appointment.into())))
}

/// PUT /api/appointments/:id/cancel - Cancel (owner or staff).
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/cancel",
    tag = "appointments",
    params(("id" = i64, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Cancelled appointment", body = AppointmentView),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<AppointmentView>>, ApiError> {
    let repo = AppointmentRepository::new(state.db.pool());
    let appointment = service::cancel(&repo, &user.caller(), id).await?;
    Ok(Json(ApiResponse::new(appointment.into())))
}

/// PUT /api/appointments/:id/activate - Re-activate (staff).
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/activate",
    tag = "appointments",
    params(("id" = i64, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Active appointment", body = AppointmentView),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Slot has been booked again")
    ),
    security(("bearer_auth" = []))
)]
pub async fn activate_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<AppointmentView>>, ApiError> {
    let repo = AppointmentRepository::new(state.db.pool());
    let appointment = service::activate(&repo, &user.caller(), id).await?;
    Ok(Json(ApiResponse::new(appointment.into())))
}
