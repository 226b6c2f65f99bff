//! Medical history repository for Leclat.

use sqlx::types::Json;
use sqlx::QueryBuilder;

use super::types::{MedicalHistory, MedicalHistoryUpdate, NewMedicalHistory};
use crate::db::DbPool;
use crate::{LeclatError, Result};

const HISTORY_COLUMNS: &str = "id, national_id, general, clinical, lifestyle, facial_care, \
     facial_diagnosis, treatment_plan, created_at, updated_at";

/// One history per national ID.
fn history_conflict(e: sqlx::Error) -> LeclatError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            LeclatError::Conflict("a history already exists for this national ID".to_string())
        }
        _ => e.into(),
    }
}

/// Repository for medical history operations.
pub struct HistoryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> HistoryRepository<'a> {
    /// Create a new HistoryRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Store a new history.
    pub async fn create(&self, new: &NewMedicalHistory) -> Result<MedicalHistory> {
        let result = sqlx::query(
            "INSERT INTO medical_histories (national_id, general, clinical, lifestyle,
                 facial_care, facial_diagnosis, treatment_plan)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.national_id)
        .bind(Json(&new.general))
        .bind(Json(&new.clinical))
        .bind(Json(&new.lifestyle))
        .bind(Json(&new.facial_care))
        .bind(Json(&new.facial_diagnosis))
        .bind(Json(&new.treatment_plan))
        .execute(self.pool)
        .await
        .map_err(history_conflict)?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| LeclatError::NotFound("history".to_string()))
    }

    /// Get a history by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<MedicalHistory>> {
        let sql = format!("SELECT {HISTORY_COLUMNS} FROM medical_histories WHERE id = ?");
        let history = sqlx::query_as::<_, MedicalHistory>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(history)
    }

    /// Get the history of a national ID.
    pub async fn find_by_national_id(&self, national_id: &str) -> Result<Option<MedicalHistory>> {
        let sql = format!("SELECT {HISTORY_COLUMNS} FROM medical_histories WHERE national_id = ?");
        let history = sqlx::query_as::<_, MedicalHistory>(&sql)
            .bind(national_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(history)
    }

    /// List all histories, most recently updated first.
    pub async fn list(&self) -> Result<Vec<MedicalHistory>> {
        let sql = format!(
            "SELECT {HISTORY_COLUMNS} FROM medical_histories ORDER BY updated_at DESC, id DESC"
        );
        let histories = sqlx::query_as::<_, MedicalHistory>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(histories)
    }

    /// Replace the supplied sections of a history.
    ///
    /// Returns the updated history, or None if not found.
    pub async fn update(
        &self,
        id: i64,
        update: &MedicalHistoryUpdate,
    ) -> Result<Option<MedicalHistory>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("UPDATE medical_histories SET updated_at = datetime('now')");

        if let Some(ref national_id) = update.national_id {
            query.push(", national_id = ");
            query.push_bind(national_id.clone());
        }
        if let Some(ref general) = update.general {
            query.push(", general = ");
            query.push_bind(Json(general.clone()));
        }
        if let Some(ref clinical) = update.clinical {
            query.push(", clinical = ");
            query.push_bind(Json(clinical.clone()));
        }
        if let Some(ref lifestyle) = update.lifestyle {
            query.push(", lifestyle = ");
            query.push_bind(Json(lifestyle.clone()));
        }
        if let Some(ref facial_care) = update.facial_care {
            query.push(", facial_care = ");
            query.push_bind(Json(facial_care.clone()));
        }
        if let Some(ref facial_diagnosis) = update.facial_diagnosis {
            query.push(", facial_diagnosis = ");
            query.push_bind(Json(facial_diagnosis.clone()));
        }
        if let Some(ref treatment_plan) = update.treatment_plan {
            query.push(", treatment_plan = ");
            query.push_bind(Json(treatment_plan.clone()));
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(history_conflict)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }
}
