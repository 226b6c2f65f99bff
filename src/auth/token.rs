//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the account ID, role and (optionally)
//! email. There is no leeway on expiry.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Account, Role};
use crate::LeclatError;

/// Token verification and signing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature is valid but `exp` has passed.
    #[error("token expired")]
    Expired,

    /// Token is not a well-formed JWT signed with our key.
    #[error("token malformed")]
    Malformed,

    /// Signing failed.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl From<TokenError> for LeclatError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => LeclatError::TokenExpired,
            TokenError::Malformed => LeclatError::TokenMalformed,
            TokenError::Encoding(msg) => LeclatError::Internal(msg),
        }
    }
}

/// Claims embedded in every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: i64,
    /// Account role at issue time.
    pub role: Role,
    /// Account email at issue time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at (Unix seconds).
    pub iat: u64,
    /// Expiration (Unix seconds).
    pub exp: u64,
    /// Unique token ID.
    pub jti: String,
}

/// Who a token is issued for.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    /// Account ID.
    pub identity_id: i64,
    /// Account role.
    pub role: Role,
    /// Account email.
    pub email: Option<String>,
}

impl From<&Account> for TokenSubject {
    fn from(account: &Account) -> Self {
        Self {
            identity_id: account.id,
            role: account.role,
            email: Some(account.email.clone()),
        }
    }
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from a secret and the default token lifetime.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Default token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: &TokenSubject, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now().timestamp().max(0) as u64;
        self.issue_at(subject, now, ttl)
    }

    /// Issue a token with the default lifetime.
    pub fn issue_default(&self, subject: &TokenSubject) -> Result<String, TokenError> {
        self.issue(subject, self.ttl)
    }

    pub(crate) fn issue_at(
        &self,
        subject: &TokenSubject,
        issued_at: u64,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.identity_id,
            role: subject.role,
            email: subject.email.clone(),
            iat: issued_at,
            exp: issued_at + ttl.as_secs(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!("JWT validation failed: {}", e);
                    TokenError::Malformed
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject {
        TokenSubject {
            identity_id: 7,
            role: Role::Staff,
            email: Some("staff@leclat.test".to_string()),
        }
    }

    fn now() -> u64 {
        Utc::now().timestamp() as u64
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new("test-secret-0123456789", Duration::from_secs(3600));
        let token = issuer.issue_default(&subject()).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.email.as_deref(), Some("staff@leclat.test"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_each_token_has_unique_id() {
        let issuer = TokenIssuer::new("test-secret-0123456789", Duration::from_secs(60));
        let a = issuer.verify(&issuer.issue_default(&subject()).unwrap()).unwrap();
        let b = issuer.verify(&issuer.issue_default(&subject()).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_token() {
        let issuer = TokenIssuer::new("test-secret-0123456789", Duration::from_secs(3600));
        let token = issuer
            .issue_at(&subject(), now() - 7200, Duration::from_secs(3600))
            .unwrap();
        assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_no_leeway_on_expiry() {
        let issuer = TokenIssuer::new("test-secret-0123456789", Duration::from_secs(3600));
        let token = issuer
            .issue_at(&subject(), now() - 10, Duration::from_secs(5))
            .unwrap();
        assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let issuer = TokenIssuer::new("secret-one-0123456789", Duration::from_secs(60));
        let other = TokenIssuer::new("secret-two-0123456789", Duration::from_secs(60));
        let token = issuer.issue_default(&subject()).unwrap();
        assert_eq!(other.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let issuer = TokenIssuer::new("test-secret-0123456789", Duration::from_secs(60));
        assert_eq!(issuer.verify("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(issuer.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            LeclatError::from(TokenError::Expired),
            LeclatError::TokenExpired
        ));
        assert!(matches!(
            LeclatError::from(TokenError::Malformed),
            LeclatError::TokenMalformed
        ));
    }
}
