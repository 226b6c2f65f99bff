//! Service catalog repository for Leclat.

use rand_core::{OsRng, RngCore};
use sqlx::QueryBuilder;

use super::types::{NewSpaService, ServiceFilter, SpaService, SpaServiceUpdate, CODE_PREFIX};
use crate::db::DbPool;
use crate::{LeclatError, Result};

const SERVICE_COLUMNS: &str = "id, code, name, image, price, description, indications, \
     recommended_frequency, duration, contraindications, category, active, created_at";

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_LEN: usize = 6;
const CODE_ATTEMPTS: usize = 5;

/// Generate a `SERV-XXXXXX` code.
pub(crate) fn generate_code() -> String {
    let mut bytes = [0u8; CODE_LEN];
    OsRng.fill_bytes(&mut bytes);
    let suffix: String = bytes
        .iter()
        .map(|b| CODE_ALPHABET[*b as usize % CODE_ALPHABET.len()] as char)
        .collect();
    format!("{CODE_PREFIX}{suffix}")
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Repository for catalog operations.
pub struct ServiceRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ServiceRepository<'a> {
    /// Create a new ServiceRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Add a service with a fresh public code.
    pub async fn create(&self, new: &NewSpaService) -> Result<SpaService> {
        for _ in 0..CODE_ATTEMPTS {
            let code = generate_code();
            let inserted = sqlx::query(
                "INSERT INTO services (code, name, image, price, description, indications,
                     recommended_frequency, duration, contraindications, category, active)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&code)
            .bind(&new.name)
            .bind(&new.image)
            .bind(new.price)
            .bind(&new.description)
            .bind(&new.indications)
            .bind(&new.recommended_frequency)
            .bind(&new.duration)
            .bind(&new.contraindications)
            .bind(&new.category)
            .bind(new.active)
            .execute(self.pool)
            .await;

            match inserted {
                Ok(result) => {
                    return self
                        .get_by_id(result.last_insert_rowid())
                        .await?
                        .ok_or_else(|| LeclatError::NotFound("service".to_string()));
                }
                Err(e) if is_unique_violation(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(LeclatError::Conflict(
            "could not allocate a service code".to_string(),
        ))
    }

    /// Get a service by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<SpaService>> {
        let sql = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?");
        let service = sqlx::query_as::<_, SpaService>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(service)
    }

    /// List services, newest first.
    pub async fn list(&self, filter: &ServiceFilter) -> Result<Vec<SpaService>> {
        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new(format!("SELECT {SERVICE_COLUMNS} FROM services WHERE 1 = 1"));
        if let Some(active) = filter.active {
            query.push(" AND active = ");
            query.push_bind(active);
        }
        if let Some(ref category) = filter.category {
            query.push(" AND category = ");
            query.push_bind(category.trim().to_lowercase());
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let services = query
            .build_query_as::<SpaService>()
            .fetch_all(self.pool)
            .await?;
        Ok(services)
    }

    /// Update a service by ID.
    ///
    /// Returns the updated service, or None if not found.
    pub async fn update(&self, id: i64, update: &SpaServiceUpdate) -> Result<Option<SpaService>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE services SET ");
        let mut separated = query.separated(", ");

        let text_fields = [
            ("name", &update.name),
            ("image", &update.image),
            ("description", &update.description),
            ("duration", &update.duration),
            ("category", &update.category),
            ("indications", &update.indications),
            ("recommended_frequency", &update.recommended_frequency),
            ("contraindications", &update.contraindications),
        ];
        for (column, value) in text_fields {
            if let Some(value) = value {
                separated.push(format!("{column} = "));
                separated.push_bind_unseparated(value.clone());
            }
        }
        if let Some(price) = update.price {
            separated.push("price = ");
            separated.push_bind_unseparated(price);
        }
        if let Some(active) = update.active {
            separated.push("active = ");
            separated.push_bind_unseparated(active);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Set the active flag of a service.
    ///
    /// Returns the updated service, or None if not found.
    pub async fn set_active(&self, id: i64, active: bool) -> Result<Option<SpaService>> {
        let result = sqlx::query("UPDATE services SET active = ? WHERE id = ?")
            .bind(active)
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }
}
