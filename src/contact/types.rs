//! Contact message model.

use sqlx::FromRow;

/// A stored contact message.
#[derive(Debug, Clone, FromRow)]
pub struct ContactMessage {
    /// Unique message ID.
    pub id: i64,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// Received timestamp.
    pub created_at: String,
}

/// Data for a new contact message.
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
}
