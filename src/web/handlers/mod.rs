//! API handlers.

pub mod account;
pub mod appointment;
pub mod auth;
pub mod catalog;
pub mod contact;
pub mod history;
pub mod status;

pub use account::*;
pub use appointment::*;
pub use auth::*;
pub use catalog::*;
pub use contact::*;
pub use history::*;
pub use status::*;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::Database;

/// Database handle shared by all handlers.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database.
    pub db: SharedDatabase,
    /// Bearer token issuer/verifier.
    pub issuer: Arc<TokenIssuer>,
    /// Password-reset window.
    pub reset_token_ttl: chrono::Duration,
    /// Write issued reset tokens to the log. Never set in production.
    pub log_reset_tokens: bool,
    /// Deployment environment name.
    pub environment: String,
}

impl AppState {
    /// Create the state from the loaded configuration.
    pub fn new(db: SharedDatabase, config: &Config) -> Self {
        let issuer = TokenIssuer::new(
            &config.auth.jwt_secret,
            Duration::from_secs(config.auth.token_ttl_secs),
        );
        Self {
            db,
            issuer: Arc::new(issuer),
            reset_token_ttl: chrono::Duration::seconds(
                config.auth.reset_token_ttl_secs.min(u64::from(u32::MAX)) as i64,
            ),
            log_reset_tokens: config.auth.log_reset_tokens && !config.server.is_production(),
            environment: config.server.environment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reset_token_logging_off_in_production() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        let mut config = Config::default();
        config.auth.jwt_secret = "test-secret-key-for-testing-only".to_string();
        config.auth.log_reset_tokens = true;

        assert!(AppState::new(db.clone(), &config).log_reset_tokens);

        config.server.environment = "production".to_string();
        assert!(!AppState::new(db, &config).log_reset_tokens);
    }
}
