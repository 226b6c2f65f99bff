//! Appointment service for Leclat.
//!
//! High-level booking operations with role checks on top of the repository.

use tracing::info;

use super::repository::AppointmentRepository;
use super::types::{
    validate_date, validate_time, Appointment, AppointmentStatus, AppointmentUpdate,
    NewAppointment,
};
use crate::auth::Caller;
use crate::db::Role;
use crate::{LeclatError, Result};

fn not_found() -> LeclatError {
    LeclatError::NotFound("appointment".to_string())
}

/// Book an appointment on behalf of `caller`.
pub async fn book(
    repo: &AppointmentRepository<'_>,
    caller: &Caller,
    new: NewAppointment,
) -> Result<Appointment> {
    let new = new.with_account(caller.id).validated()?;
    let appointment = repo.create(&new).await?;

    info!(
        appointment_id = appointment.id,
        account_id = caller.id,
        date = %appointment.date,
        time = %appointment.time,
        "Appointment booked"
    );
    Ok(appointment)
}

/// List appointments. Staff see everything; customers see only their own.
pub async fn list(
    repo: &AppointmentRepository<'_>,
    caller: &Caller,
    status: Option<AppointmentStatus>,
) -> Result<Vec<Appointment>> {
    let owner = if caller.role.can_access(Role::Staff) {
        None
    } else {
        Some(caller.id)
    };
    repo.list(status, owner).await
}

/// Times already taken on `date`.
pub async fn availability(
    repo: &AppointmentRepository<'_>,
    date: &str,
) -> Result<(String, Vec<String>)> {
    let date = validate_date(date)?;
    let taken = repo.taken_times(&date).await?;
    Ok((date, taken))
}

/// Check whether `date` + `time` is already booked.
pub async fn exists(repo: &AppointmentRepository<'_>, date: &str, time: &str) -> Result<bool> {
    repo.slot_taken(&validate_date(date)?, &validate_time(time)?).await
}

/// Edit an appointment (staff only).
pub async fn update(
    repo: &AppointmentRepository<'_>,
    caller: &Caller,
    id: i64,
    update: AppointmentUpdate,
) -> Result<Appointment> {
    caller.require(Role::Staff)?;
    let update = update.validated()?;
    let appointment = repo.update(id, &update).await?.ok_or_else(not_found)?;

    info!(appointment_id = id, by = caller.id, "Appointment updated");
    Ok(appointment)
}

/// Cancel an appointment. Allowed for its owner and for staff.
pub async fn cancel(
    repo: &AppointmentRepository<'_>,
    caller: &Caller,
    id: i64,
) -> Result<Appointment> {
    let appointment = repo.get_by_id(id).await?.ok_or_else(not_found)?;
    if appointment.account_id != Some(caller.id) {
        caller.require(Role::Staff)?;
    }

    let appointment = repo
        .set_status(id, AppointmentStatus::Cancelled)
        .await?
        .ok_or_else(not_found)?;

    info!(appointment_id = id, by = caller.id, "Appointment cancelled");
    Ok(appointment)
}

/// Re-activate a cancelled appointment (staff only).
pub async fn activate(
    repo: &AppointmentRepository<'_>,
    caller: &Caller,
    id: i64,
) -> Result<Appointment> {
    caller.require(Role::Staff)?;
    let appointment = repo
        .set_status(id, AppointmentStatus::Active)
        .await?
        .ok_or_else(not_found)?;

    info!(appointment_id = id, by = caller.id, "Appointment activated");
    Ok(appointment)
}
