//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::appointment::{Appointment, AppointmentStatus};
use crate::auth::Authenticated;
use crate::catalog::SpaService;
use crate::contact::ContactMessage;
use crate::db::{Account, Role};
use crate::history::{
    ClinicalHistory, FacialCare, FacialDiagnosis, GeneralData, Lifestyle, MedicalHistory,
    TreatmentPlan,
};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
}

/// Plain message response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Account DTOs
// ============================================================================

/// Public projection of an account. Never carries the credential hash or
/// reset fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountView {
    /// Account ID.
    pub id: i64,
    /// National ID.
    pub national_id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role.
    pub role: Role,
    /// Whether the account may log in.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            national_id: account.national_id,
            email: account.email,
            display_name: account.display_name,
            phone: account.phone,
            role: account.role,
            active: account.active,
            created_at: account.created_at,
        }
    }
}

/// Registration and login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// The authenticated account.
    pub account: AccountView,
    /// Bearer token (JWT).
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

impl From<Authenticated> for AuthResponse {
    fn from(auth: Authenticated) -> Self {
        Self {
            account: auth.account.into(),
            token: auth.token,
            expires_in: auth.expires_in,
        }
    }
}

/// Reset token check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidTokenResponse {
    /// Whether the token can still be used.
    pub valid: bool,
}

// ============================================================================
// Appointment DTOs
// ============================================================================

/// Appointment response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentView {
    /// Appointment ID.
    pub id: i64,
    /// Booking account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    /// Client name.
    pub client_name: String,
    /// Client national ID.
    pub national_id: String,
    /// Service.
    pub service: String,
    /// Date (`YYYY-MM-DD`).
    pub date: String,
    /// Time (`HH:MM`).
    pub time: String,
    /// Limitation note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limitation: Option<String>,
    /// Status.
    pub status: AppointmentStatus,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Appointment> for AppointmentView {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            account_id: a.account_id,
            client_name: a.client_name,
            national_id: a.national_id,
            service: a.service,
            date: a.date,
            time: a.time,
            limitation: a.limitation,
            status: a.status,
            created_at: a.created_at,
        }
    }
}

/// Times taken on a date.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    /// Date (`YYYY-MM-DD`).
    pub date: String,
    /// Booked times (`HH:MM`).
    pub taken_times: Vec<String>,
}

/// Slot existence response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExistsResponse {
    /// Whether an active appointment holds the slot.
    pub exists: bool,
}

// ============================================================================
// Contact DTOs
// ============================================================================

/// Contact message response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactView {
    /// Message ID.
    pub id: i64,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Subject.
    pub subject: String,
    /// Body.
    pub message: String,
    /// Received timestamp.
    pub created_at: String,
}

impl From<ContactMessage> for ContactView {
    fn from(m: ContactMessage) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            subject: m.subject,
            message: m.message,
            created_at: m.created_at,
        }
    }
}

// ============================================================================
// Service Catalog DTOs
// ============================================================================

/// Catalog entry response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceView {
    /// Service ID.
    pub id: i64,
    /// Public code (`SERV-XXXXXX`).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Image URL or path.
    pub image: String,
    /// Price.
    pub price: f64,
    /// Description.
    pub description: String,
    /// Indications.
    pub indications: String,
    /// Recommended frequency.
    pub recommended_frequency: String,
    /// Duration.
    pub duration: String,
    /// Contraindications.
    pub contraindications: String,
    /// Category.
    pub category: String,
    /// Whether the service is offered.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<SpaService> for ServiceView {
    fn from(s: SpaService) -> Self {
        Self {
            id: s.id,
            code: s.code,
            name: s.name,
            image: s.image,
            price: s.price,
            description: s.description,
            indications: s.indications,
            recommended_frequency: s.recommended_frequency,
            duration: s.duration,
            contraindications: s.contraindications,
            category: s.category,
            active: s.active,
            created_at: s.created_at,
        }
    }
}

// ============================================================================
// Medical History DTOs
// ============================================================================

/// Medical history response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryView {
    /// History ID.
    pub id: i64,
    /// Client national ID.
    pub national_id: String,
    /// General data.
    pub general: GeneralData,
    /// Clinical background.
    pub clinical: ClinicalHistory,
    /// Lifestyle and habits.
    pub lifestyle: Lifestyle,
    /// Current facial care.
    pub facial_care: FacialCare,
    /// Facial diagnosis.
    pub facial_diagnosis: FacialDiagnosis,
    /// Treatment plan.
    pub treatment_plan: TreatmentPlan,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<MedicalHistory> for HistoryView {
    fn from(h: MedicalHistory) -> Self {
        Self {
            id: h.id,
            national_id: h.national_id,
            general: h.general,
            clinical: h.clinical,
            lifestyle: h.lifestyle,
            facial_care: h.facial_care,
            facial_diagnosis: h.facial_diagnosis,
            treatment_plan: h.treatment_plan,
            created_at: h.created_at,
            updated_at: h.updated_at,
        }
    }
}

// ============================================================================
// Status DTOs
// ============================================================================

/// Service status response.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// `ok` when the process is serving.
    pub status: String,
    /// `connected` or `disconnected`.
    pub database: String,
    /// Deployment environment.
    pub environment: String,
    /// Crate version.
    pub version: String,
}
