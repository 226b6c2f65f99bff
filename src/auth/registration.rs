//! Account registration for Leclat.

use tracing::info;

use crate::auth::validation::{normalize_email, validate_identity};
use crate::auth::{hash_password, validate_password, Authenticated, Caller, TokenIssuer};
use crate::db::{Account, AccountRepository, NewAccount, Role};
use crate::{LeclatError, Result};

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// National ID (1-20 letters, digits or '-').
    pub national_id: String,
    /// Email address (normalized before storage).
    pub email: String,
    /// Display name (1-100 characters).
    pub display_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Plaintext credential (6-128 characters).
    pub credential: String,
    /// Requested role; anything above customer needs an admin caller.
    pub role: Option<Role>,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        national_id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            national_id: national_id.into(),
            email: email.into(),
            display_name: display_name.into(),
            phone: None,
            credential: credential.into(),
            role: None,
        }
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Request a role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Validate, hash and persist a new account.
///
/// Duplicate detection happens twice: a lookup first, then the unique index
/// on insert (which catches concurrent registrations).
pub(crate) async fn create_from_request(
    repo: &AccountRepository<'_>,
    request: RegistrationRequest,
    role: Role,
) -> Result<Account> {
    let national_id = request.national_id.trim().to_string();
    let email = normalize_email(&request.email);
    let display_name = request.display_name.trim().to_string();
    let phone = request
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    validate_identity(&national_id, &email, &display_name, phone.as_deref())?;
    validate_password(&request.credential)?;

    if repo.identity_exists(&national_id, &email).await? {
        return Err(LeclatError::DuplicateIdentity);
    }

    let password_hash = hash_password(&request.credential)?;

    let mut new_account =
        NewAccount::new(national_id, email, display_name, password_hash).with_role(role);
    if let Some(phone) = phone {
        new_account = new_account.with_phone(phone);
    }

    repo.create(&new_account).await
}

/// Register a new account and issue its first token.
///
/// This function:
/// 1. Resolves the role (non-customer roles need an admin `caller`)
/// 2. Validates and normalizes all fields
/// 3. Rejects a national ID or email already in use
/// 4. Hashes the credential and creates the account
/// 5. Issues a bearer token
pub async fn register(
    repo: &AccountRepository<'_>,
    issuer: &TokenIssuer,
    request: RegistrationRequest,
    caller: Option<&Caller>,
) -> Result<Authenticated> {
    let role = request.role.unwrap_or_default();
    if role != Role::Customer && !caller.is_some_and(Caller::is_admin) {
        return Err(LeclatError::Forbidden(
            "only an administrator can assign roles".to_string(),
        ));
    }

    let account = create_from_request(repo, request, role).await?;

    info!(
        account_id = account.id,
        role = %account.role,
        "New account registered"
    );

    Authenticated::issue(issuer, account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::time::Duration;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("registration-test-secret", Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_register_success() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AccountRepository::new(db.pool());
        let issuer = issuer();

        let request = RegistrationRequest::new(" 111 ", "A@X.com", " Ana ", "secret1")
            .with_phone("8888-0000");
        let outcome = register(&repo, &issuer, request, None).await.unwrap();

        assert_eq!(outcome.account.national_id, "111");
        assert_eq!(outcome.account.email, "a@x.com");
        assert_eq!(outcome.account.display_name, "Ana");
        assert_eq!(outcome.account.role, Role::Customer);
        assert!(outcome.account.password_hash.verify("secret1"));
        assert_eq!(outcome.expires_in, 3600);

        let claims = issuer.verify(&outcome.token).unwrap();
        assert_eq!(claims.sub, outcome.account.id);
        assert_eq!(claims.email.as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_register_duplicate_national_id_or_email() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AccountRepository::new(db.pool());
        let issuer = issuer();

        register(&repo, &issuer, RegistrationRequest::new("111", "a@x.com", "Ana", "secret1"), None)
            .await
            .unwrap();

        let same_id = RegistrationRequest::new("111", "b@x.com", "Bea", "secret1");
        assert!(matches!(
            register(&repo, &issuer, same_id, None).await,
            Err(LeclatError::DuplicateIdentity)
        ));

        let same_email = RegistrationRequest::new("222", "A@x.COM", "Bea", "secret1");
        assert!(matches!(
            register(&repo, &issuer, same_email, None).await,
            Err(LeclatError::DuplicateIdentity)
        ));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AccountRepository::new(db.pool());
        let issuer = issuer();

        let cases = [
            RegistrationRequest::new("", "a@x.com", "Ana", "secret1"),
            RegistrationRequest::new("111", "not-an-email", "Ana", "secret1"),
            RegistrationRequest::new("111", "a@x.com", "  ", "secret1"),
            RegistrationRequest::new("111", "a@x.com", "Ana", "short"),
        ];
        for request in cases {
            assert!(matches!(
                register(&repo, &issuer, request, None).await,
                Err(LeclatError::Validation(_))
            ));
        }
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_elevated_role_requires_admin() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AccountRepository::new(db.pool());
        let issuer = issuer();

        let request = RegistrationRequest::new("111", "a@x.com", "Ana", "secret1").with_role(Role::Staff);
        assert!(matches!(
            register(&repo, &issuer, request.clone(), None).await,
            Err(LeclatError::Forbidden(_))
        ));

        let staff = Caller::new(99, Role::Staff);
        assert!(matches!(
            register(&repo, &issuer, request.clone(), Some(&staff)).await,
            Err(LeclatError::Forbidden(_))
        ));

        let admin = Caller::new(1, Role::Admin);
        let outcome = register(&repo, &issuer, request, Some(&admin)).await.unwrap();
        assert_eq!(outcome.account.role, Role::Staff);
    }

    #[tokio::test]
    async fn test_register_explicit_customer_role_is_allowed() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AccountRepository::new(db.pool());
        let request =
            RegistrationRequest::new("111", "a@x.com", "Ana", "secret1").with_role(Role::Customer);
        let outcome = register(&repo, &issuer(), request, None).await.unwrap();
        assert_eq!(outcome.account.role, Role::Customer);
    }
}
