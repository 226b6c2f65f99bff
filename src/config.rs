//! Configuration module for Leclat.
//!
//! The configuration is read once at startup from `config.toml`, patched
//! with environment overrides and then handed down by reference.

use serde::Deserialize;
use std::path::Path;

use crate::{LeclatError, Result};

/// Minimum accepted length of the token-signing secret, in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 16;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment environment name (development, production, ...).
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
        }
    }
}

impl ServerConfig {
    /// Whether the server runs in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/leclat.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/leclat.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Token-signing secret (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Bearer token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// Password-reset window in seconds.
    #[serde(default = "default_reset_token_ttl")]
    pub reset_token_ttl_secs: u64,
    /// Write freshly issued reset tokens to the log. Never enable in production.
    #[serde(default)]
    pub log_reset_tokens: bool,
}

fn default_token_ttl() -> u64 {
    86400 // 24 hours
}

fn default_reset_token_ttl() -> u64 {
    3600 // 1 hour
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            reset_token_ttl_secs: default_reset_token_ttl(),
            log_reset_tokens: false,
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins. Empty means permissive development mode.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Rate limit for login and password-reset requests (requests per minute).
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit: u32,
    /// Rate limit for general API endpoints (requests per minute).
    #[serde(default = "default_api_rate_limit")]
    pub api_rate_limit: u32,
}

fn default_login_rate_limit() -> u32 {
    10
}

fn default_api_rate_limit() -> u32 {
    300
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            login_rate_limit: default_login_rate_limit(),
            api_rate_limit: default_api_rate_limit(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LeclatError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| LeclatError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `LECLAT_JWT_SECRET`: token-signing secret
    /// - `LECLAT_DATABASE_PATH`: SQLite database file
    /// - `LECLAT_PORT`: listen port
    /// - `LECLAT_CORS_ORIGINS`: comma-separated allowed origins
    /// - `LECLAT_ENV`: deployment environment name
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(secret) = non_empty("LECLAT_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(path) = non_empty("LECLAT_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(port) = non_empty("LECLAT_PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid LECLAT_PORT"),
            }
        }
        if let Some(origins) = non_empty("LECLAT_CORS_ORIGINS") {
            self.web.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(env) = non_empty("LECLAT_ENV") {
            self.server.environment = env;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the JWT secret is missing or shorter than [`MIN_JWT_SECRET_LENGTH`]
    /// - a token lifetime is zero
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(LeclatError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via the LECLAT_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.auth.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(LeclatError::Config(format!(
                "jwt_secret must be at least {MIN_JWT_SECRET_LENGTH} bytes"
            )));
        }
        if self.auth.token_ttl_secs == 0 || self.auth.reset_token_ttl_secs == 0 {
            return Err(LeclatError::Config(
                "token lifetimes must be greater than zero".to_string(),
            ));
        }
        if self.auth.log_reset_tokens && self.server.is_production() {
            return Err(LeclatError::Config(
                "log_reset_tokens must be disabled in production".to_string(),
            ));
        }
        Ok(())
    }
}
