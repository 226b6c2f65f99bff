//! Service catalog for Leclat.
//!
//! The treatments the spa offers, with price, duration and care notes.
//! Removing a service only withdraws it; the row and its code are kept.

mod repository;
pub mod service;
mod types;

pub use repository::ServiceRepository;
pub use types::{NewSpaService, ServiceFilter, SpaService, SpaServiceUpdate, DEFAULT_CATEGORY};
