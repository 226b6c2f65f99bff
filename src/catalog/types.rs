//! Service catalog model.

use sqlx::FromRow;

use crate::{LeclatError, Result};

/// Prefix of every public service code.
pub const CODE_PREFIX: &str = "SERV-";

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "other";

/// Placeholder for indications and recommended frequency.
pub const TO_BE_DEFINED: &str = "To be defined";

/// Placeholder for contraindications.
pub const NO_CONTRAINDICATIONS: &str = "None";

/// Maximum length for short text fields (name, duration, category).
pub const MAX_SHORT_FIELD: usize = 200;

/// Maximum length for long text fields (description, indications).
pub const MAX_LONG_FIELD: usize = 2_000;

/// A service offered by the spa.
#[derive(Debug, Clone, FromRow)]
pub struct SpaService {
    /// Unique service ID.
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
    /// Duration, as free text ("60 min").
    pub duration: String,
    /// Contraindications.
    pub contraindications: String,
    /// Category (lower-case).
    pub category: String,
    /// Whether the service is offered. Deletion clears this flag.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// Data for a new catalog entry. Blank optional fields get placeholders.
#[derive(Debug, Clone, Default)]
pub struct NewSpaService {
    /// Display name.
    pub name: String,
    /// Image URL or path.
    pub image: String,
    /// Price.
    pub price: f64,
    /// Description.
    pub description: String,
    /// Duration.
    pub duration: String,
    /// Category.
    pub category: String,
    /// Indications.
    pub indications: String,
    /// Recommended frequency.
    pub recommended_frequency: String,
    /// Contraindications.
    pub contraindications: String,
    /// Initial active flag.
    pub active: bool,
}

impl NewSpaService {
    /// Create a catalog entry with the required fields.
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        price: f64,
        description: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            price,
            description: description.into(),
            duration: duration.into(),
            active: true,
            ..Default::default()
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Trim and validate all fields, filling placeholders.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            name: required("name", &self.name, MAX_SHORT_FIELD)?,
            image: required("image", &self.image, MAX_LONG_FIELD)?,
            price: validate_price(self.price)?,
            description: required("description", &self.description, MAX_LONG_FIELD)?,
            duration: required("duration", &self.duration, MAX_SHORT_FIELD)?,
            category: or_default(&self.category, DEFAULT_CATEGORY, MAX_SHORT_FIELD)?.to_lowercase(),
            indications: or_default(&self.indications, TO_BE_DEFINED, MAX_LONG_FIELD)?,
            recommended_frequency: or_default(
                &self.recommended_frequency,
                TO_BE_DEFINED,
                MAX_SHORT_FIELD,
            )?,
            contraindications: or_default(
                &self.contraindications,
                NO_CONTRAINDICATIONS,
                MAX_LONG_FIELD,
            )?,
            active: self.active,
        })
    }
}

/// Partial update of a catalog entry.
#[derive(Debug, Clone, Default)]
pub struct SpaServiceUpdate {
    /// New name.
    pub name: Option<String>,
    /// New image.
    pub image: Option<String>,
    /// New price.
    pub price: Option<f64>,
    /// New description.
    pub description: Option<String>,
    /// New duration.
    pub duration: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New indications.
    pub indications: Option<String>,
    /// New recommended frequency.
    pub recommended_frequency: Option<String>,
    /// New contraindications.
    pub contraindications: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
}

impl SpaServiceUpdate {
    /// Check if the update carries no changes.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.duration.is_none()
            && self.category.is_none()
            && self.indications.is_none()
            && self.recommended_frequency.is_none()
            && self.contraindications.is_none()
            && self.active.is_none()
    }

    /// Trim and validate the supplied fields.
    pub fn validated(self) -> Result<Self> {
        let text = |field: &str, value: Option<String>, max: usize| {
            value.map(|v| required(field, &v, max)).transpose()
        };
        Ok(Self {
            name: text("name", self.name, MAX_SHORT_FIELD)?,
            image: text("image", self.image, MAX_LONG_FIELD)?,
            price: self.price.map(validate_price).transpose()?,
            description: text("description", self.description, MAX_LONG_FIELD)?,
            duration: text("duration", self.duration, MAX_SHORT_FIELD)?,
            category: text("category", self.category, MAX_SHORT_FIELD)?
                .map(|c| c.to_lowercase()),
            indications: text("indications", self.indications, MAX_LONG_FIELD)?,
            recommended_frequency: text(
                "recommended_frequency",
                self.recommended_frequency,
                MAX_SHORT_FIELD,
            )?,
            contraindications: text("contraindications", self.contraindications, MAX_LONG_FIELD)?,
            active: self.active,
        })
    }
}

/// Catalog listing filter.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Only entries with this active flag.
    pub active: Option<bool>,
    /// Only entries in this category (case-insensitive).
    pub category: Option<String>,
}

fn required(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LeclatError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(LeclatError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

fn or_default(value: &str, default: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default.to_string());
    }
    if value.chars().count() > max {
        return Err(LeclatError::Validation(format!(
            "value must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(LeclatError::Validation(
            "price must be zero or positive".to_string(),
        ));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_service_placeholders() {
        let service = NewSpaService::new(" Hydrafacial ", "/img/h.png", 120.0, "Deep clean", "60 min")
            .with_category(" Facial ")
            .validated()
            .unwrap();
        assert_eq!(service.name, "Hydrafacial");
        assert_eq!(service.category, "facial");
        assert_eq!(service.indications, TO_BE_DEFINED);
        assert_eq!(service.recommended_frequency, TO_BE_DEFINED);
        assert_eq!(service.contraindications, NO_CONTRAINDICATIONS);
        assert!(service.active);

        let uncategorized = NewSpaService::new("Massage", "/img/m.png", 80.0, "Relax", "45 min")
            .validated()
            .unwrap();
        assert_eq!(uncategorized.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_new_service_rejects_bad_fields() {
        let missing_image = NewSpaService::new("Massage", " ", 80.0, "Relax", "45 min");
        assert!(matches!(
            missing_image.validated(),
            Err(LeclatError::Validation(_))
        ));

        let negative = NewSpaService::new("Massage", "/img/m.png", -1.0, "Relax", "45 min");
        assert!(negative.validated().is_err());

        let nan = NewSpaService::new("Massage", "/img/m.png", f64::NAN, "Relax", "45 min");
        assert!(nan.validated().is_err());
    }

    #[test]
    fn test_update_validation() {
        let update = SpaServiceUpdate {
            category: Some(" BODY ".to_string()),
            price: Some(0.0),
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(update.category.as_deref(), Some("body"));
        assert_eq!(update.price, Some(0.0));

        let blank = SpaServiceUpdate {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.validated().is_err());
        assert!(SpaServiceUpdate::default().is_empty());
    }
}
