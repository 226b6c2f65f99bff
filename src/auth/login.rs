//! Login for Leclat.

use tracing::{info, warn};

use crate::auth::{TokenIssuer, TokenSubject};
use crate::db::{Account, AccountRepository};
use crate::{LeclatError, Result};

/// An account together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// The authenticated account.
    pub account: Account,
    /// Signed bearer token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

impl Authenticated {
    /// Issue a default-lifetime token for `account`.
    pub(crate) fn issue(issuer: &TokenIssuer, account: Account) -> Result<Self> {
        let token = issuer.issue_default(&TokenSubject::from(&account))?;
        Ok(Self {
            account,
            token,
            expires_in: issuer.ttl().as_secs(),
        })
    }
}

/// Authenticate with a national ID or email and a credential.
///
/// An unknown identifier and a disabled account both fail with `NotFound`;
/// a wrong credential fails with `InvalidCredential`.
pub async fn login(
    repo: &AccountRepository<'_>,
    issuer: &TokenIssuer,
    identifier: &str,
    credential: &str,
) -> Result<Authenticated> {
    let identifier = identifier.trim();

    let account = match repo.find_by_identifier(identifier).await? {
        Some(account) if account.active => account,
        Some(account) => {
            warn!(account_id = account.id, "Login attempt on disabled account");
            return Err(LeclatError::NotFound("account".to_string()));
        }
        None => return Err(LeclatError::NotFound("account".to_string())),
    };

    if !account.password_hash.verify(credential) {
        warn!(account_id = account.id, "Login failed: invalid credentials");
        return Err(LeclatError::InvalidCredential);
    }

    info!(account_id = account.id, role = %account.role, "Login successful");
    Authenticated::issue(issuer, account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{register, RegistrationRequest};
    use crate::db::Database;
    use std::time::Duration;

    async fn setup() -> (Database, TokenIssuer) {
        let db = Database::open_in_memory().await.unwrap();
        let issuer = TokenIssuer::new("login-test-secret-xyz", Duration::from_secs(86400));
        let repo = AccountRepository::new(db.pool());
        register(
            &repo,
            &issuer,
            RegistrationRequest::new("111", "a@x.com", "Ana", "secret1"),
            None,
        )
        .await
        .unwrap();
        (db, issuer)
    }

    #[tokio::test]
    async fn test_login_by_email_and_national_id() {
        let (db, issuer) = setup().await;
        let repo = AccountRepository::new(db.pool());

        let by_email = login(&repo, &issuer, "a@x.com", "secret1").await.unwrap();
        assert_eq!(by_email.account.national_id, "111");
        assert_eq!(by_email.expires_in, 86400);
        assert_eq!(issuer.verify(&by_email.token).unwrap().sub, by_email.account.id);

        let by_id = login(&repo, &issuer, " 111 ", "secret1").await.unwrap();
        assert_eq!(by_id.account.id, by_email.account.id);

        let upper = login(&repo, &issuer, "A@X.COM", "secret1").await.unwrap();
        assert_eq!(upper.account.id, by_email.account.id);
    }

    #[tokio::test]
    async fn test_login_wrong_credential() {
        let (db, issuer) = setup().await;
        let repo = AccountRepository::new(db.pool());
        assert!(matches!(
            login(&repo, &issuer, "a@x.com", "wrong").await,
            Err(LeclatError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_identifier() {
        let (db, issuer) = setup().await;
        let repo = AccountRepository::new(db.pool());
        assert!(matches!(
            login(&repo, &issuer, "ghost@x.com", "secret1").await,
            Err(LeclatError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_login_disabled_account() {
        let (db, issuer) = setup().await;
        let repo = AccountRepository::new(db.pool());
        let account = repo.find_by_national_id("111").await.unwrap().unwrap();
        repo.set_active(account.id, false).await.unwrap();

        assert!(matches!(
            login(&repo, &issuer, "111", "secret1").await,
            Err(LeclatError::NotFound(_))
        ));
    }
}
