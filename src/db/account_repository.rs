//! Account repository for Leclat.
//!
//! This module provides CRUD operations for accounts in the database.

use sqlx::QueryBuilder;

use super::account::{Account, AccountUpdate, NewAccount};
use super::DbPool;
use crate::{LeclatError, Result};

const ACCOUNT_COLUMNS: &str = "id, national_id, email, display_name, phone, role, active,
     password_hash, reset_token, reset_token_expiry, created_at, updated_at";

/// Repository for account CRUD operations.
pub struct AccountRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new account in the database.
    ///
    /// A unique-index violation on `national_id` or `email` surfaces as
    /// [`LeclatError::DuplicateIdentity`].
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        let result = sqlx::query(
            "INSERT INTO usuarios (national_id, email, display_name, phone, role, password_hash)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_account.national_id)
        .bind(&new_account.email)
        .bind(&new_account.display_name)
        .bind(&new_account.phone)
        .bind(new_account.role.as_str())
        .bind(new_account.password_hash.as_str())
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| LeclatError::NotFound("account".to_string()))
    }

    /// Get an account by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM usuarios WHERE id = ?");
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(account)
    }

    /// Find an account whose national ID or email matches `identifier`.
    ///
    /// The email comparison is case-insensitive.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM usuarios
             WHERE national_id = ? OR email = ? COLLATE NOCASE
             ORDER BY id LIMIT 1"
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(identifier)
            .bind(identifier)
            .fetch_optional(self.pool)
            .await?;
        Ok(account)
    }

    /// Get an account by national ID.
    pub async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM usuarios WHERE national_id = ?");
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(national_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(account)
    }

    /// Get an account by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM usuarios WHERE email = ? COLLATE NOCASE");
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(account)
    }

    /// Check whether `national_id` or `email` is already registered.
    pub async fn identity_exists(&self, national_id: &str, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM usuarios WHERE national_id = ? OR email = ? COLLATE NOCASE",
        )
        .bind(national_id)
        .bind(email)
        .fetch_one(self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Check whether `email` belongs to an account other than `id`.
    pub async fn email_taken_by_other(&self, email: &str, id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM usuarios WHERE email = ? COLLATE NOCASE AND id != ?",
        )
        .bind(email)
        .bind(id)
        .fetch_one(self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Update an account by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated account, or None if not found.
    pub async fn update(&self, id: i64, update: &AccountUpdate) -> Result<Option<Account>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE usuarios SET ");
        let mut separated = query.separated(", ");

        if let Some(ref display_name) = update.display_name {
            separated.push("display_name = ");
            separated.push_bind_unseparated(display_name.clone());
        }
        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email.clone());
        }
        if let Some(ref phone) = update.phone {
            separated.push("phone = ");
            separated.push_bind_unseparated(phone.clone());
        }
        if let Some(ref hash) = update.password_hash {
            separated.push("password_hash = ");
            separated.push_bind_unseparated(hash.as_str().to_string());
        }
        if let Some(role) = update.role {
            separated.push("role = ");
            separated.push_bind_unseparated(role.as_str());
        }
        if let Some(active) = update.active {
            separated.push("active = ");
            separated.push_bind_unseparated(active);
        }
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Enable or disable an account. Disabling also drops any pending reset.
    ///
    /// Returns true if an account was updated, false if not found.
    pub async fn set_active(&self, id: i64, active: bool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE usuarios
             SET active = ?,
                 reset_token = CASE WHEN ? THEN reset_token END,
                 reset_token_expiry = CASE WHEN ? THEN reset_token_expiry END,
                 updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(active)
        .bind(active)
        .bind(active)
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a reset-token digest and its expiry, replacing any previous one.
    pub async fn set_reset_token(&self, id: i64, token_digest: &str, expires_at: &str) -> Result<()> {
        sqlx::query(
            "UPDATE usuarios SET reset_token = ?, reset_token_expiry = ?, updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(token_digest)
        .bind(expires_at)
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Find the active account holding `token_digest` whose expiry is after
    /// `now`.
    pub async fn find_by_valid_reset_token(
        &self,
        token_digest: &str,
        now: &str,
    ) -> Result<Option<Account>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM usuarios
             WHERE reset_token = ? AND reset_token_expiry > ? AND active = 1"
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(token_digest)
            .bind(now)
            .fetch_optional(self.pool)
            .await?;
        Ok(account)
    }

    /// Replace the credential of the account holding a still-valid reset
    /// token and clear both reset fields in a single statement.
    ///
    /// Returns the account ID, or None when no valid token matched.
    pub async fn complete_reset(
        &self,
        token_digest: &str,
        now: &str,
        new_hash: &str,
    ) -> Result<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar(
            "UPDATE usuarios
             SET password_hash = ?, reset_token = NULL, reset_token_expiry = NULL,
                 updated_at = datetime('now')
             WHERE reset_token = ? AND reset_token_expiry > ? AND active = 1
             RETURNING id",
        )
        .bind(new_hash)
        .bind(token_digest)
        .bind(now)
        .fetch_optional(self.pool)
        .await?;
        Ok(id)
    }

    /// Clear reset-token pairs whose expiry is at or before `now`.
    ///
    /// Returns the number of accounts touched.
    pub async fn clear_expired_reset_tokens(&self, now: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE usuarios SET reset_token = NULL, reset_token_expiry = NULL
             WHERE reset_token_expiry IS NOT NULL AND reset_token_expiry <= ?",
        )
        .bind(now)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List accounts ordered by ID, with pagination.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM usuarios ORDER BY id LIMIT ? OFFSET ?");
        let accounts = sqlx::query_as::<_, Account>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;
        Ok(accounts)
    }

    /// Count all accounts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
