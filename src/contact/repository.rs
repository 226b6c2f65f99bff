//! Contact message repository.

use super::types::{ContactMessage, NewContactMessage};
use crate::db::DbPool;
use crate::{LeclatError, Result};

/// Repository for contact messages.
pub struct ContactRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new ContactRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Store a message.
    pub async fn create(&self, message: &NewContactMessage) -> Result<ContactMessage> {
        let result = sqlx::query(
            "INSERT INTO contact_messages (name, email, subject, message) VALUES (?, ?, ?, ?)",
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .execute(self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| LeclatError::NotFound("contact message".to_string()))
    }

    /// Get a message by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<ContactMessage>> {
        let message = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, subject, message, created_at FROM contact_messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(message)
    }

    /// All messages, newest first.
    pub async fn list(&self) -> Result<Vec<ContactMessage>> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, subject, message, created_at FROM contact_messages
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(messages)
    }
}
