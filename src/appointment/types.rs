//! Appointment model for Leclat.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::{LeclatError, Result};

/// Maximum length for free-text appointment fields.
pub const MAX_FIELD_LENGTH: usize = 200;

/// Appointment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked and holding its slot.
    #[default]
    Active,
    /// Cancelled; the slot is free again.
    Cancelled,
}

impl AppointmentStatus {
    /// Convert status to its stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Active => "active",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "activa" => Ok(AppointmentStatus::Active),
            "cancelled" | "canceled" | "cancelada" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("unknown appointment status: {s}")),
        }
    }
}

/// Appointment entity.
#[derive(Debug, Clone)]
pub struct Appointment {
    /// Unique appointment ID.
    pub id: i64,
    /// Account that booked it, if known.
    pub account_id: Option<i64>,
    /// Client name.
    pub client_name: String,
    /// Client national ID.
    pub national_id: String,
    /// Requested service.
    pub service: String,
    /// Date (`YYYY-MM-DD`).
    pub date: String,
    /// Time (`HH:MM`).
    pub time: String,
    /// Physical limitation or note.
    pub limitation: Option<String>,
    /// Current status.
    pub status: AppointmentStatus,
    /// Creation timestamp.
    pub created_at: String,
}

impl<'r> FromRow<'r, SqliteRow> for Appointment {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(Self {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            client_name: row.try_get("client_name")?,
            national_id: row.try_get("national_id")?,
            service: row.try_get("service")?,
            date: row.try_get("date")?,
            time: row.try_get("time")?,
            limitation: row.try_get("limitation")?,
            status: status.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Data for booking a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    /// Booking account.
    pub account_id: Option<i64>,
    /// Client name.
    pub client_name: String,
    /// Client national ID.
    pub national_id: String,
    /// Requested service.
    pub service: String,
    /// Date (`YYYY-MM-DD`).
    pub date: String,
    /// Time (`HH:MM`).
    pub time: String,
    /// Physical limitation or note.
    pub limitation: Option<String>,
}

impl NewAppointment {
    /// Create a new appointment record.
    pub fn new(
        client_name: impl Into<String>,
        national_id: impl Into<String>,
        service: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            account_id: None,
            client_name: client_name.into(),
            national_id: national_id.into(),
            service: service.into(),
            date: date.into(),
            time: time.into(),
            limitation: None,
        }
    }

    /// Set the booking account.
    pub fn with_account(mut self, account_id: i64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Set the limitation note.
    pub fn with_limitation(mut self, limitation: impl Into<String>) -> Self {
        self.limitation = Some(limitation.into());
        self
    }

    /// Trim and validate all fields.
    pub fn validated(mut self) -> Result<Self> {
        self.client_name = required("client_name", &self.client_name)?;
        self.national_id = required("national_id", &self.national_id)?;
        self.service = required("service", &self.service)?;
        self.date = validate_date(&self.date)?;
        self.time = validate_time(&self.time)?;
        self.limitation = self
            .limitation
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Ok(self)
    }
}

/// Data for updating an existing appointment.
#[derive(Debug, Clone, Default)]
pub struct AppointmentUpdate {
    /// New client name.
    pub client_name: Option<String>,
    /// New national ID.
    pub national_id: Option<String>,
    /// New service.
    pub service: Option<String>,
    /// New date.
    pub date: Option<String>,
    /// New time.
    pub time: Option<String>,
    /// New limitation note.
    pub limitation: Option<String>,
}

impl AppointmentUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the update carries no changes.
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.national_id.is_none()
            && self.service.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.limitation.is_none()
    }

    /// Trim and validate the supplied fields.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            client_name: self
                .client_name
                .map(|v| required("client_name", &v))
                .transpose()?,
            national_id: self
                .national_id
                .map(|v| required("national_id", &v))
                .transpose()?,
            service: self.service.map(|v| required("service", &v)).transpose()?,
            date: self.date.map(|v| validate_date(&v)).transpose()?,
            time: self.time.map(|v| validate_time(&v)).transpose()?,
            limitation: self.limitation.map(|v| v.trim().to_string()),
        })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LeclatError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(LeclatError::Validation(format!(
            "{field} must be at most {MAX_FIELD_LENGTH} characters"
        )));
    }
    Ok(value.to_string())
}

/// Validate and normalize a `YYYY-MM-DD` date.
pub fn validate_date(date: &str) -> Result<String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| LeclatError::Validation("date must be YYYY-MM-DD".to_string()))
}

/// Validate and normalize an `HH:MM` time.
pub fn validate_time(time: &str) -> Result<String> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| LeclatError::Validation("time must be HH:MM".to_string()))
}
