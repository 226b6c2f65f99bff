//! Medical history model for Leclat.
//!
//! A history is keyed by the client's national ID and split into sections.
//! Each section is stored as a JSON document and replaced as a whole.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

use crate::appointment::validate_date;
use crate::{LeclatError, Result};

/// Maximum length for free-text history fields.
pub const MAX_TEXT_LENGTH: usize = 1_000;

/// General client data. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct GeneralData {
    /// Full name.
    pub full_name: String,
    /// Age in years.
    pub age: u32,
    /// Birth date (`YYYY-MM-DD`).
    pub birth_date: String,
    /// Occupation.
    pub occupation: String,
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
    /// Reason for the consultation.
    pub reason: String,
}

/// Pregnancy or breastfeeding status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyStatus {
    #[default]
    #[serde(alias = "No")]
    No,
    #[serde(alias = "Embarazo")]
    Pregnant,
    #[serde(alias = "Lactancia")]
    Breastfeeding,
}

/// Pregnancy details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Pregnancy {
    /// Current status.
    pub status: PregnancyStatus,
    /// Weeks of pregnancy, only with `pregnant`.
    pub weeks: Option<u32>,
}

/// Clinical background.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ClinicalHistory {
    pub skin_conditions: Vec<String>,
    pub chronic_diseases: Vec<String>,
    pub allergies: Vec<String>,
    pub current_medication: String,
    pub pregnancy: Pregnancy,
    pub current_treatment: String,
    pub continuous_medication: Vec<String>,
    pub recent_surgeries: Vec<String>,
}

/// Stress level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    #[serde(alias = "Bajo")]
    Low,
    #[default]
    #[serde(alias = "Medio")]
    Medium,
    #[serde(alias = "Alto")]
    High,
}

/// Diet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    #[default]
    #[serde(alias = "Balanceada")]
    Balanced,
    #[serde(alias = "Desordenada")]
    Irregular,
    #[serde(alias = "Rica en grasas")]
    HighFat,
}

/// Substance use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Substances {
    pub alcohol: bool,
    pub tobacco: bool,
    pub caffeine: bool,
}

/// Lifestyle and habits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Lifestyle {
    pub stress: StressLevel,
    /// Daily water intake in litres.
    pub water_intake: f64,
    pub diet: Diet,
    pub sleep_hours: u32,
    pub substances: Substances,
}

impl Default for Lifestyle {
    fn default() -> Self {
        Self {
            stress: StressLevel::default(),
            water_intake: 0.0,
            diet: Diet::default(),
            sleep_hours: 7,
            substances: Substances::default(),
        }
    }
}

/// Sunscreen use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sunscreen {
    #[serde(alias = "Si")]
    Yes,
    #[default]
    #[serde(alias = "No")]
    No,
    #[serde(alias = "A veces")]
    Sometimes,
}

/// Professional facial cleansing frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CleansingFrequency {
    #[serde(alias = "Mensual")]
    Monthly,
    #[serde(alias = "Trimestral")]
    Quarterly,
    #[default]
    #[serde(alias = "Nunca")]
    Never,
}

/// Current facial care routine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct FacialCare {
    pub sunscreen: Sunscreen,
    pub cleansing_frequency: CleansingFrequency,
    pub current_products: Vec<String>,
    pub daily_routine: Vec<String>,
}

/// Skin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    #[default]
    Normal,
    #[serde(alias = "Grasa")]
    Oily,
    #[serde(alias = "Seca")]
    Dry,
    #[serde(alias = "Mixta")]
    Combination,
    #[serde(alias = "Sensible/Reactiva")]
    Sensitive,
}

/// Facial diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct FacialDiagnosis {
    pub skin_type: SkinType,
    pub visual_observations: Vec<String>,
    pub wood_lamp_observations: Vec<String>,
    pub tactile_observations: Vec<String>,
}

/// Treatment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct TreatmentPlan {
    pub final_diagnosis: String,
    pub recommended_treatment: String,
    /// Sessions per month.
    pub suggested_frequency: u32,
    pub sessions: u32,
    pub equipment: Vec<String>,
}

impl Default for TreatmentPlan {
    fn default() -> Self {
        Self {
            final_diagnosis: String::new(),
            recommended_treatment: String::new(),
            suggested_frequency: 1,
            sessions: 1,
            equipment: Vec::new(),
        }
    }
}

/// Medical history entity.
#[derive(Debug, Clone)]
pub struct MedicalHistory {
    /// Unique history ID.
    pub id: i64,
    /// Client national ID.
    pub national_id: String,
    pub general: GeneralData,
    pub clinical: ClinicalHistory,
    pub lifestyle: Lifestyle,
    pub facial_care: FacialCare,
    pub facial_diagnosis: FacialDiagnosis,
    pub treatment_plan: TreatmentPlan,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl<'r> FromRow<'r, SqliteRow> for MedicalHistory {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let Json(general): Json<GeneralData> = row.try_get("general")?;
        let Json(clinical): Json<ClinicalHistory> = row.try_get("clinical")?;
        let Json(lifestyle): Json<Lifestyle> = row.try_get("lifestyle")?;
        let Json(facial_care): Json<FacialCare> = row.try_get("facial_care")?;
        let Json(facial_diagnosis): Json<FacialDiagnosis> = row.try_get("facial_diagnosis")?;
        let Json(treatment_plan): Json<TreatmentPlan> = row.try_get("treatment_plan")?;
        Ok(Self {
            id: row.try_get("id")?,
            national_id: row.try_get("national_id")?,
            general,
            clinical,
            lifestyle,
            facial_care,
            facial_diagnosis,
            treatment_plan,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Data for a new medical history.
#[derive(Debug, Clone, Default)]
pub struct NewMedicalHistory {
    /// National ID of the owning account.
    pub national_id: String,
    pub general: GeneralData,
    pub clinical: ClinicalHistory,
    pub lifestyle: Lifestyle,
    pub facial_care: FacialCare,
    pub facial_diagnosis: FacialDiagnosis,
    pub treatment_plan: TreatmentPlan,
}

impl NewMedicalHistory {
    /// Create a history with the required sections; the rest default.
    pub fn new(national_id: impl Into<String>, general: GeneralData) -> Self {
        Self {
            national_id: national_id.into(),
            general,
            ..Default::default()
        }
    }

    /// Trim and validate every section.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            national_id: validate_national_id(&self.national_id)?,
            general: self.general.validated()?,
            clinical: self.clinical.validated()?,
            lifestyle: self.lifestyle.validated()?,
            facial_care: self.facial_care,
            facial_diagnosis: self.facial_diagnosis,
            treatment_plan: self.treatment_plan.validated()?,
        })
    }
}

/// Section-wise update of a medical history. Supplied sections replace the
/// stored ones.
#[derive(Debug, Clone, Default)]
pub struct MedicalHistoryUpdate {
    pub national_id: Option<String>,
    pub general: Option<GeneralData>,
    pub clinical: Option<ClinicalHistory>,
    pub lifestyle: Option<Lifestyle>,
    pub facial_care: Option<FacialCare>,
    pub facial_diagnosis: Option<FacialDiagnosis>,
    pub treatment_plan: Option<TreatmentPlan>,
}

impl MedicalHistoryUpdate {
    /// Check if the update carries no changes.
    pub fn is_empty(&self) -> bool {
        self.national_id.is_none()
            && self.general.is_none()
            && self.clinical.is_none()
            && self.lifestyle.is_none()
            && self.facial_care.is_none()
            && self.facial_diagnosis.is_none()
            && self.treatment_plan.is_none()
    }

    /// Validate the supplied sections.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            national_id: self
                .national_id
                .map(|n| validate_national_id(&n))
                .transpose()?,
            general: self.general.map(GeneralData::validated).transpose()?,
            clinical: self.clinical.map(ClinicalHistory::validated).transpose()?,
            lifestyle: self.lifestyle.map(Lifestyle::validated).transpose()?,
            facial_care: self.facial_care,
            facial_diagnosis: self.facial_diagnosis,
            treatment_plan: self
                .treatment_plan
                .map(TreatmentPlan::validated)
                .transpose()?,
        })
    }
}

impl GeneralData {
    fn validated(self) -> Result<Self> {
        if self.age > 150 {
            return Err(LeclatError::Validation("age is out of range".to_string()));
        }
        Ok(Self {
            full_name: required("full_name", &self.full_name)?,
            age: self.age,
            birth_date: validate_date(&self.birth_date)?,
            occupation: required("occupation", &self.occupation)?,
            phone: required("phone", &self.phone)?,
            email: required("email", &self.email)?.to_lowercase(),
            reason: required("reason", &self.reason)?,
        })
    }
}

impl ClinicalHistory {
    fn validated(self) -> Result<Self> {
        match (self.pregnancy.status, self.pregnancy.weeks) {
            (PregnancyStatus::Pregnant, Some(weeks)) if weeks > 42 => {
                return Err(LeclatError::Validation(
                    "pregnancy weeks must be at most 42".to_string(),
                ));
            }
            (PregnancyStatus::No | PregnancyStatus::Breastfeeding, Some(_)) => {
                return Err(LeclatError::Validation(
                    "pregnancy weeks apply only during pregnancy".to_string(),
                ));
            }
            _ => {}
        }
        Ok(self)
    }
}

impl Lifestyle {
    fn validated(self) -> Result<Self> {
        if !self.water_intake.is_finite() || self.water_intake < 0.0 {
            return Err(LeclatError::Validation(
                "water_intake must be zero or positive".to_string(),
            ));
        }
        if self.sleep_hours > 24 {
            return Err(LeclatError::Validation(
                "sleep_hours must be at most 24".to_string(),
            ));
        }
        Ok(self)
    }
}

impl TreatmentPlan {
    fn validated(self) -> Result<Self> {
        if self.suggested_frequency == 0 || self.sessions == 0 {
            return Err(LeclatError::Validation(
                "suggested_frequency and sessions must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

fn validate_national_id(value: &str) -> Result<String> {
    required("national_id", value)
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LeclatError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(LeclatError::Validation(format!(
            "{field} must be at most {MAX_TEXT_LENGTH} characters"
        )));
    }
    Ok(value.to_string())
}
