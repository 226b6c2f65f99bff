//! Contact messages for Leclat.
//!
//! Messages sent from the public contact form, readable by staff.

mod repository;
mod types;

pub use repository::ContactRepository;
pub use types::{ContactMessage, NewContactMessage};

use tracing::info;

use crate::auth::validation::{normalize_email, validate_email};
use crate::auth::Caller;
use crate::db::Role;
use crate::{LeclatError, Result};

/// Maximum subject length.
pub const MAX_SUBJECT_LENGTH: usize = 200;

/// Maximum message body length.
pub const MAX_MESSAGE_LENGTH: usize = 5_000;

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

/// Validate and store a contact message.
pub async fn submit(
    repo: &ContactRepository<'_>,
    message: NewContactMessage,
) -> Result<ContactMessage> {
    let email = normalize_email(&message.email);
    validate_email(&email)?;

    let message = NewContactMessage {
        name: required("name", &message.name, MAX_SUBJECT_LENGTH)?,
        email,
        subject: required("subject", &message.subject, MAX_SUBJECT_LENGTH)?,
        message: required("message", &message.message, MAX_MESSAGE_LENGTH)?,
    };

    let stored = repo.create(&message).await?;
    info!(message_id = stored.id, "Contact message received");
    Ok(stored)
}

/// List contact messages, newest first (staff only).
pub async fn list(repo: &ContactRepository<'_>, caller: &Caller) -> Result<Vec<ContactMessage>> {
    caller.require(Role::Staff)?;
    repo.list().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn message(email: &str) -> NewContactMessage {
        NewContactMessage {
            name: " Ana ".to_string(),
            email: email.to_string(),
            subject: "Hours".to_string(),
            message: "Are you open on Sunday?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = ContactRepository::new(db.pool());

        let stored = submit(&repo, message("Ana@X.com")).await.unwrap();
        assert_eq!(stored.name, "Ana");
        assert_eq!(stored.email, "ana@x.com");

        let staff = Caller::new(1, Role::Staff);
        assert_eq!(list(&repo, &staff).await.unwrap().len(), 1);

        let customer = Caller::new(2, Role::Customer);
        assert!(matches!(
            list(&repo, &customer).await,
            Err(LeclatError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = ContactRepository::new(db.pool());

        assert!(matches!(
            submit(&repo, message("nope")).await,
            Err(LeclatError::Validation(_))
        ));

        let mut blank = message("a@x.com");
        blank.subject = "   ".to_string();
        assert!(matches!(
            submit(&repo, blank).await,
            Err(LeclatError::Validation(msg)) if msg.contains("subject")
        ));
    }
}
