//! Appointment repository for Leclat.

use sqlx::QueryBuilder;

use super::types::{Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment};
use crate::db::DbPool;
use crate::{LeclatError, Result};

const APPOINTMENT_COLUMNS: &str =
    "id, account_id, client_name, national_id, service, date, time, limitation, status, created_at";

/// The partial unique index on active (date, time) pairs is the slot lock.
fn slot_conflict(e: sqlx::Error) -> LeclatError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            LeclatError::Conflict("time slot already booked".to_string())
        }
        _ => e.into(),
    }
}

/// Repository for appointment operations.
pub struct AppointmentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AppointmentRepository<'a> {
    /// Create a new AppointmentRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Book a new appointment.
    pub async fn create(&self, new: &NewAppointment) -> Result<Appointment> {
        let result = sqlx::query(
            "INSERT INTO appointments (account_id, client_name, national_id, service, date, time, limitation)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.account_id)
        .bind(&new.client_name)
        .bind(&new.national_id)
        .bind(&new.service)
        .bind(&new.date)
        .bind(&new.time)
        .bind(&new.limitation)
        .execute(self.pool)
        .await
        .map_err(slot_conflict)?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| LeclatError::NotFound("appointment".to_string()))
    }

    /// Get an appointment by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?");
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(appointment)
    }

    /// List appointments ordered by date and time, optionally filtered by
    /// status and booking account.
    pub async fn list(
        &self,
        status: Option<AppointmentStatus>,
        account_id: Option<i64>,
    ) -> Result<Vec<Appointment>> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE 1 = 1"
        ));
        if let Some(status) = status {
            query.push(" AND status = ");
            query.push_bind(status.as_str());
        }
        if let Some(account_id) = account_id {
            query.push(" AND account_id = ");
            query.push_bind(account_id);
        }
        query.push(" ORDER BY date, time, id");

        let appointments = query
            .build_query_as::<Appointment>()
            .fetch_all(self.pool)
            .await?;
        Ok(appointments)
    }

    /// Times already held by active appointments on `date`.
    pub async fn taken_times(&self, date: &str) -> Result<Vec<String>> {
        let times = sqlx::query_scalar(
            "SELECT time FROM appointments WHERE date = ? AND status = 'active' ORDER BY time",
        )
        .bind(date)
        .fetch_all(self.pool)
        .await?;
        Ok(times)
    }

    /// Check whether an active appointment holds `date` + `time`.
    pub async fn slot_taken(&self, date: &str, time: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE date = ? AND time = ? AND status = 'active'",
        )
        .bind(date)
        .bind(time)
        .fetch_one(self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Update an appointment by ID.
    ///
    /// Returns the updated appointment, or None if not found.
    pub async fn update(&self, id: i64, update: &AppointmentUpdate) -> Result<Option<Appointment>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE appointments SET ");
        let mut separated = query.separated(", ");

        if let Some(ref client_name) = update.client_name {
            separated.push("client_name = ");
            separated.push_bind_unseparated(client_name.clone());
        }
        if let Some(ref national_id) = update.national_id {
            separated.push("national_id = ");
            separated.push_bind_unseparated(national_id.clone());
        }
        if let Some(ref service) = update.service {
            separated.push("service = ");
            separated.push_bind_unseparated(service.clone());
        }
        if let Some(ref date) = update.date {
            separated.push("date = ");
            separated.push_bind_unseparated(date.clone());
        }
        if let Some(ref time) = update.time {
            separated.push("time = ");
            separated.push_bind_unseparated(time.clone());
        }
        if let Some(ref limitation) = update.limitation {
            separated.push("limitation = ");
            separated.push_bind_unseparated(Some(limitation.clone()).filter(|l| !l.is_empty()));
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(slot_conflict)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Set the status of an appointment.
    ///
    /// Returns the updated appointment, or None if not found. Re-activating
    /// into a slot that has since been booked fails with `Conflict`.
    pub async fn set_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let result = sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(slot_conflict)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }
}
