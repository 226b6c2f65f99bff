//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed, trimmed_email};
use crate::appointment::{AppointmentUpdate, NewAppointment};
use crate::auth::{ProfileUpdate, RegistrationRequest};
use crate::catalog::{NewSpaService, ServiceFilter, SpaServiceUpdate};
use crate::contact::NewContactMessage;
use crate::db::Role;
use crate::history::{
    ClinicalHistory, FacialCare, FacialDiagnosis, GeneralData, Lifestyle, MedicalHistoryUpdate,
    NewMedicalHistory, TreatmentPlan,
};

// ============================================================================
// Auth DTOs
// ============================================================================

/// Account registration request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// National ID.
    #[validate(
        length(max = 20, message = "National ID must be at most 20 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub national_id: String,
    /// Email address.
    #[validate(custom(function = "trimmed_email"))]
    pub email: String,
    /// Display name.
    #[validate(
        length(max = 100, message = "Display name must be at most 100 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub display_name: String,
    /// Phone number.
    #[serde(default)]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    /// Initial credential.
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub credential: String,
    /// Requested role (admin callers only).
    #[serde(default)]
    pub role: Option<Role>,
}

impl From<RegisterRequest> for RegistrationRequest {
    fn from(req: RegisterRequest) -> Self {
        RegistrationRequest {
            national_id: req.national_id,
            email: req.email,
            display_name: req.display_name,
            phone: req.phone,
            credential: req.credential,
            role: req.role,
        }
    }
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    /// National ID or email.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub identifier: String,
    /// Credential.
    #[validate(length(min = 1, message = "Password is required"))]
    pub credential: String,
}

/// Password reset request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ForgotPasswordRequest {
    /// National ID or email.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub identifier: String,
}

/// Password reset completion.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ResetPasswordRequest {
    /// New credential.
    #[validate(length(min = 1, max = 128, message = "Password must be 1 to 128 characters"))]
    pub new_credential: String,
}

// ============================================================================
// Account DTOs
// ============================================================================

/// Partial account update. Empty strings are ignored.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAccountRequest {
    /// New display name.
    #[serde(default)]
    #[validate(
        length(max = 100, message = "Display name must be at most 100 characters"),
        custom(function = "no_control_chars")
    )]
    pub display_name: Option<String>,
    /// New email.
    #[serde(default)]
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: Option<String>,
    /// New phone.
    #[serde(default)]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    /// New credential.
    #[serde(default)]
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub credential: Option<String>,
    /// New role (admin only).
    #[serde(default)]
    pub role: Option<Role>,
    /// New status (admin only).
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<UpdateAccountRequest> for ProfileUpdate {
    fn from(req: UpdateAccountRequest) -> Self {
        ProfileUpdate {
            display_name: req.display_name,
            email: req.email,
            phone: req.phone,
            credential: req.credential,
            role: req.role,
            active: req.active,
        }
    }
}

/// Admin account creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAccountRequest {
    /// National ID.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub national_id: String,
    /// Email address.
    #[validate(custom(function = "trimmed_email"))]
    pub email: String,
    /// Display name.
    #[validate(
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub display_name: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Initial credential.
    pub credential: String,
    /// Role (defaults to customer).
    #[serde(default)]
    pub role: Option<Role>,
}

impl From<CreateAccountRequest> for RegistrationRequest {
    fn from(req: CreateAccountRequest) -> Self {
        RegistrationRequest {
            national_id: req.national_id,
            email: req.email,
            display_name: req.display_name,
            phone: req.phone,
            credential: req.credential,
            role: req.role,
        }
    }
}

/// Enable/disable request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SetStatusRequest {
    /// Whether the account may log in.
    pub active: bool,
}

/// Account lookup query.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    /// National ID to look for.
    pub national_id: Option<String>,
    /// Email to look for.
    pub email: Option<String>,
}

/// Pagination query parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    50
}

/// Largest page size accepted.
pub const MAX_PER_PAGE: u32 = 100;

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationQuery {
    /// Clamp page and per_page into range.
    pub fn normalized(&self) -> (u32, u32) {
        (self.page.max(1), self.per_page.clamp(1, MAX_PER_PAGE))
    }

    /// Convert to SQL offset and limit.
    pub fn to_offset_limit(&self) -> (i64, i64) {
        let (page, per_page) = self.normalized();
        let offset = (page as i64 - 1) * per_page as i64;
        (offset, per_page as i64)
    }
}

// ============================================================================
// Appointment DTOs
// ============================================================================

/// Booking request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAppointmentRequest {
    /// Client name.
    #[validate(
        length(max = 200, message = "Client name must be at most 200 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub client_name: String,
    /// Client national ID.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub national_id: String,
    /// Requested service.
    #[validate(
        length(max = 200, message = "Service must be at most 200 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub service: String,
    /// Date (`YYYY-MM-DD`).
    pub date: String,
    /// Time (`HH:MM`).
    pub time: String,
    /// Physical limitation or note.
    #[serde(default)]
    #[validate(length(max = 200, message = "Limitation must be at most 200 characters"))]
    pub limitation: Option<String>,
}

impl From<CreateAppointmentRequest> for NewAppointment {
    fn from(req: CreateAppointmentRequest) -> Self {
        let new = NewAppointment::new(
            req.client_name,
            req.national_id,
            req.service,
            req.date,
            req.time,
        );
        match req.limitation {
            Some(limitation) => new.with_limitation(limitation),
            None => new,
        }
    }
}

/// Partial appointment update.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAppointmentRequest {
    /// New client name.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub client_name: Option<String>,
    /// New national ID.
    #[serde(default)]
    pub national_id: Option<String>,
    /// New service.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub service: Option<String>,
    /// New date.
    #[serde(default)]
    pub date: Option<String>,
    /// New time.
    #[serde(default)]
    pub time: Option<String>,
    /// New limitation note.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub limitation: Option<String>,
}

impl From<UpdateAppointmentRequest> for AppointmentUpdate {
    fn from(req: UpdateAppointmentRequest) -> Self {
        AppointmentUpdate {
            client_name: req.client_name,
            national_id: req.national_id,
            service: req.service,
            date: req.date,
            time: req.time,
            limitation: req.limitation,
        }
    }
}

/// Appointment list filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentListQuery {
    /// `active` or `cancelled`.
    pub status: Option<String>,
}

/// Availability query.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Date (`YYYY-MM-DD`).
    pub date: String,
}

/// Slot existence query.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotQuery {
    /// Date (`YYYY-MM-DD`).
    pub date: String,
    /// Time (`HH:MM`).
    pub time: String,
}

// ============================================================================
// Contact DTOs
// ============================================================================

/// Contact form submission.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    /// Sender name.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub name: String,
    /// Sender email.
    #[validate(custom(function = "trimmed_email"))]
    pub email: String,
    /// Subject line.
    #[validate(
        length(max = 200, message = "Subject must be at most 200 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub subject: String,
    /// Message body.
    #[validate(
        length(max = 5000, message = "Message must be at most 5000 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub message: String,
}

impl From<ContactRequest> for NewContactMessage {
    fn from(req: ContactRequest) -> Self {
        NewContactMessage {
            name: req.name,
            email: req.email,
            subject: req.subject,
            message: req.message,
        }
    }
}

// ============================================================================
// Service Catalog DTOs
// ============================================================================

/// New catalog entry.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateServiceRequest {
    /// Display name.
    #[validate(
        length(max = 200, message = "Name must be at most 200 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub name: String,
    /// Image URL or path.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub image: String,
    /// Price.
    #[validate(range(min = 0.0, message = "Price must be zero or positive"))]
    pub price: f64,
    /// Description.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub description: String,
    /// Duration ("60 min").
    #[validate(custom(function = "not_empty_trimmed"))]
    pub duration: String,
    /// Category, `other` when omitted.
    #[serde(default)]
    pub category: Option<String>,
    /// Indications.
    #[serde(default)]
    pub indications: Option<String>,
    /// Recommended frequency.
    #[serde(default)]
    pub recommended_frequency: Option<String>,
    /// Contraindications.
    #[serde(default)]
    pub contraindications: Option<String>,
    /// Initial active flag, defaults to true.
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<CreateServiceRequest> for NewSpaService {
    fn from(req: CreateServiceRequest) -> Self {
        NewSpaService {
            name: req.name,
            image: req.image,
            price: req.price,
            description: req.description,
            duration: req.duration,
            category: req.category.unwrap_or_default(),
            indications: req.indications.unwrap_or_default(),
            recommended_frequency: req.recommended_frequency.unwrap_or_default(),
            contraindications: req.contraindications.unwrap_or_default(),
            active: req.active.unwrap_or(true),
        }
    }
}

/// Partial catalog update.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateServiceRequest {
    /// New name.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    /// New image.
    #[serde(default)]
    pub image: Option<String>,
    /// New price.
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Price must be zero or positive"))]
    pub price: Option<f64>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New duration.
    #[serde(default)]
    pub duration: Option<String>,
    /// New category.
    #[serde(default)]
    pub category: Option<String>,
    /// New indications.
    #[serde(default)]
    pub indications: Option<String>,
    /// New recommended frequency.
    #[serde(default)]
    pub recommended_frequency: Option<String>,
    /// New contraindications.
    #[serde(default)]
    pub contraindications: Option<String>,
    /// New active flag.
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<UpdateServiceRequest> for SpaServiceUpdate {
    fn from(req: UpdateServiceRequest) -> Self {
        SpaServiceUpdate {
            name: req.name,
            image: req.image,
            price: req.price,
            description: req.description,
            duration: req.duration,
            category: req.category,
            indications: req.indications,
            recommended_frequency: req.recommended_frequency,
            contraindications: req.contraindications,
            active: req.active,
        }
    }
}

/// Catalog list filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceListQuery {
    /// Active flag; only active services when omitted.
    pub active: Option<bool>,
    /// Category.
    pub category: Option<String>,
}

impl From<ServiceListQuery> for ServiceFilter {
    fn from(q: ServiceListQuery) -> Self {
        ServiceFilter {
            active: q.active,
            category: q.category,
        }
    }
}

// ============================================================================
// Medical History DTOs
// ============================================================================

/// New medical history.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateHistoryRequest {
    /// National ID of the client account.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub national_id: String,
    /// General data.
    pub general: GeneralData,
    /// Clinical background.
    #[serde(default)]
    pub clinical: ClinicalHistory,
    /// Lifestyle and habits.
    #[serde(default)]
    pub lifestyle: Lifestyle,
    /// Current facial care.
    #[serde(default)]
    pub facial_care: FacialCare,
    /// Facial diagnosis.
    #[serde(default)]
    pub facial_diagnosis: FacialDiagnosis,
    /// Treatment plan.
    #[serde(default)]
    pub treatment_plan: TreatmentPlan,
}

impl From<CreateHistoryRequest> for NewMedicalHistory {
    fn from(req: CreateHistoryRequest) -> Self {
        NewMedicalHistory {
            national_id: req.national_id,
            general: req.general,
            clinical: req.clinical,
            lifestyle: req.lifestyle,
            facial_care: req.facial_care,
            facial_diagnosis: req.facial_diagnosis,
            treatment_plan: req.treatment_plan,
        }
    }
}

/// Section-wise history update. Supplied sections replace the stored ones.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateHistoryRequest {
    /// New national ID.
    #[serde(default)]
    pub national_id: Option<String>,
    /// General data.
    #[serde(default)]
    pub general: Option<GeneralData>,
    /// Clinical background.
    #[serde(default)]
    pub clinical: Option<ClinicalHistory>,
    /// Lifestyle and habits.
    #[serde(default)]
    pub lifestyle: Option<Lifestyle>,
    /// Current facial care.
    #[serde(default)]
    pub facial_care: Option<FacialCare>,
    /// Facial diagnosis.
    #[serde(default)]
    pub facial_diagnosis: Option<FacialDiagnosis>,
    /// Treatment plan.
    #[serde(default)]
    pub treatment_plan: Option<TreatmentPlan>,
}

impl From<UpdateHistoryRequest> for MedicalHistoryUpdate {
    fn from(req: UpdateHistoryRequest) -> Self {
        MedicalHistoryUpdate {
            national_id: req.national_id,
            general: req.general,
            clinical: req.clinical,
            lifestyle: req.lifestyle,
            facial_care: req.facial_care,
            facial_diagnosis: req.facial_diagnosis,
            treatment_plan: req.treatment_plan,
        }
    }
}
