//! Shared helpers for the HTTP API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use serde_json::{json, Value};

use leclat::web::handlers::AppState;
use leclat::web::router::create_router;
use leclat::{hash_password, AccountRepository, Config, Database, NewAccount, Role};

/// Signing secret used by every test server.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Configuration with generous rate limits.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.web.login_rate_limit = 1000;
    config.web.api_rate_limit = 10_000;
    config
}

/// Build a test server around an in-memory database.
pub async fn create_test_server() -> (TestServer, Arc<Database>) {
    create_test_server_with(test_config()).await
}

/// Build a test server with a custom configuration.
pub async fn create_test_server_with(config: Config) -> (TestServer, Arc<Database>) {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );
    let app_state = Arc::new(AppState::new(db.clone(), &config));
    let router = create_router(app_state, &config.web);
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, db)
}

/// `Bearer <token>` header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Register a customer and return the response body.
pub async fn register(
    server: &TestServer,
    national_id: &str,
    email: &str,
    credential: &str,
) -> Value {
    let response = server
        .post("/api/register")
        .json(&json!({
            "national_id": national_id,
            "email": email,
            "display_name": "Test Client",
            "credential": credential
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Log in and return the bearer token.
pub async fn login(server: &TestServer, identifier: &str, credential: &str) -> String {
    let response = server
        .post("/api/login")
        .json(&json!({
            "identifier": identifier,
            "credential": credential
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

/// Insert an account with the given role directly into the store.
pub async fn seed_account(db: &Database, national_id: &str, role: Role, credential: &str) -> i64 {
    let hash = hash_password(credential).expect("hash");
    AccountRepository::new(db.pool())
        .create(
            &NewAccount::new(
                national_id,
                format!("{}@leclat.test", national_id),
                format!("Seeded {}", role),
                hash,
            )
            .with_role(role),
        )
        .await
        .expect("seed account")
        .id
}

/// Seed an account and return a bearer token for it.
pub async fn seed_and_login(
    server: &TestServer,
    db: &Database,
    national_id: &str,
    role: Role,
) -> (i64, String) {
    let id = seed_account(db, national_id, role, "password123").await;
    let token = login(server, national_id, "password123").await;
    (id, token)
}

/// GET with a bearer token.
pub async fn get_auth(server: &TestServer, path: &str, token: &str) -> axum_test::TestResponse {
    server.get(path).add_header(AUTHORIZATION, bearer(token)).await
}
