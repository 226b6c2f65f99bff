//! Appointment module for Leclat.
//!
//! Booking, listing and status changes for spa appointments. Only one active
//! appointment may hold a given date and time.

mod repository;
pub mod service;
mod types;

pub use repository::AppointmentRepository;
pub use types::{
    validate_date, validate_time, Appointment, AppointmentStatus, AppointmentUpdate,
    NewAppointment,
};
