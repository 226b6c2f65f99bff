//! Medical histories for Leclat.
//!
//! Client intake records kept by staff: general data, clinical background,
//! habits, facial care and diagnosis, and the treatment plan. Each client
//! national ID has at most one history.

mod repository;
pub mod service;
mod types;

pub use repository::HistoryRepository;
pub use types::{
    CleansingFrequency, ClinicalHistory, Diet, FacialCare, FacialDiagnosis, GeneralData,
    Lifestyle, MedicalHistory, MedicalHistoryUpdate, NewMedicalHistory, Pregnancy,
    PregnancyStatus, SkinType, StressLevel, Substances, Sunscreen, TreatmentPlan,
};
