//! Password reset flow for Leclat.
//!
//! A reset token is 256 bits from the OS RNG, handed to the caller in hex.
//! Only its SHA-256 digest is stored, next to an expiry timestamp.

use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::auth::hash_password;
use crate::auth::password::validate_password;
use crate::db::{format_timestamp, AccountRepository};
use crate::{LeclatError, Result};

/// Reset token size in bytes.
pub const RESET_TOKEN_BYTES: usize = 32;

/// A freshly issued reset token.
#[derive(Debug, Clone)]
pub struct IssuedReset {
    /// Account the token belongs to.
    pub account_id: i64,
    /// Raw token (hex). Only the caller ever sees this value.
    pub token: String,
    /// Expiry (storage format).
    pub expires_at: String,
}

/// Generate a random reset token, hex encoded.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hex digest of a reset token, as stored.
pub fn digest_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Start a reset for the account matching `identifier`.
///
/// Returns `None` when nothing matched (or the account is disabled). Callers
/// must answer the same way in both cases.
pub async fn request_password_reset(
    repo: &AccountRepository<'_>,
    identifier: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<Option<IssuedReset>> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Ok(None);
    }

    let account = match repo.find_by_identifier(identifier).await? {
        Some(account) if account.active => account,
        _ => return Ok(None),
    };

    let token = generate_reset_token();
    let expires_at = format_timestamp(&(now + ttl));
    repo.set_reset_token(account.id, &digest_reset_token(&token), &expires_at)
        .await?;

    info!(account_id = account.id, "Password reset requested");

    Ok(Some(IssuedReset {
        account_id: account.id,
        token,
        expires_at,
    }))
}

/// Check that `token` is known and has not expired.
pub async fn validate_reset_token(
    repo: &AccountRepository<'_>,
    token: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    repo.find_by_valid_reset_token(&digest_reset_token(token), &format_timestamp(&now))
        .await?
        .map(|_| ())
        .ok_or(LeclatError::InvalidOrExpiredToken)
}

/// Replace the credential of the account holding `token` and clear the
/// reset fields.
///
/// Fails with [`LeclatError::InvalidOrExpiredToken`] without touching the
/// stored hash when the token is unknown or expired.
pub async fn complete_reset(
    repo: &AccountRepository<'_>,
    token: &str,
    new_credential: &str,
    now: DateTime<Utc>,
) -> Result<i64> {
    validate_password(new_credential)?;

    let digest = digest_reset_token(token);
    let now = format_timestamp(&now);

    // Avoid hashing for tokens that cannot succeed.
    if repo.find_by_valid_reset_token(&digest, &now).await?.is_none() {
        return Err(LeclatError::InvalidOrExpiredToken);
    }

    let hash = hash_password(new_credential)?;
    let account_id = repo
        .complete_reset(&digest, &now, hash.as_str())
        .await?
        .ok_or(LeclatError::InvalidOrExpiredToken)?;

    info!(account_id, "Password reset completed");
    Ok(account_id)
}

/// Drop reset-token pairs that expired at or before `now`.
pub async fn purge_expired_reset_tokens(
    repo: &AccountRepository<'_>,
    now: DateTime<Utc>,
) -> Result<u64> {
    repo.clear_expired_reset_tokens(&format_timestamp(&now)).await
}
