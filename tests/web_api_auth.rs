//! Web API Authentication Tests
//!
//! Registration, login, profile and password reset through the HTTP API.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Value};

use common::{
    bearer, create_test_server, create_test_server_with, get_auth, login, register, test_config,
};
use leclat::auth::reset::request_password_reset;
use leclat::{AccountRepository, Role};

fn jwt_payload(token: &str) -> Value {
    let payload = token.split('.').nth(1).expect("JWT payload segment");
    serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
}

// ============================================================================
// End-to-end flow
// ============================================================================

#[tokio::test]
async fn test_register_login_profile_flow() {
    let (server, _db) = create_test_server().await;

    let body = register(&server, "111", "a@x.com", "secret1").await;
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["account"]["email"], "a@x.com");
    assert_eq!(body["data"]["account"]["role"], "customer");
    assert_eq!(body["data"]["expires_in"], 86400);

    let token = login(&server, "a@x.com", "secret1").await;
    let claims = jwt_payload(&token);
    assert_eq!(claims["role"], "customer");
    assert_eq!(claims["sub"], body["data"]["account"]["id"]);

    let response = server
        .post("/api/login")
        .json(&json!({"identifier": "a@x.com", "credential": "wrong"}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_CREDENTIAL");

    let response = get_auth(&server, "/api/profile", &token).await;
    response.assert_status_ok();
    let profile = response.json::<Value>();
    let account = profile["data"].as_object().unwrap();
    assert_eq!(account["national_id"], "111");
    assert!(!account.contains_key("password_hash"));
    assert!(!response.text().contains("argon2"));
}

#[tokio::test]
async fn test_login_with_national_id() {
    let (server, _db) = create_test_server().await;
    register(&server, "222-B", "b@x.com", "secret1").await;

    let token = login(&server, " 222-B ", "secret1").await;
    assert!(!token.is_empty());

    // Email lookups ignore case
    login(&server, "B@X.COM", "secret1").await;
}

#[tokio::test]
async fn test_login_unknown_identifier() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/login")
        .json(&json!({"identifier": "nobody@x.com", "credential": "secret1"}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_duplicate_identity() {
    let (server, db) = create_test_server().await;
    register(&server, "111", "a@x.com", "secret1").await;

    for (national_id, email) in [("111", "other@x.com"), ("999", "A@X.com")] {
        let response = server
            .post("/api/register")
            .json(&json!({
                "national_id": national_id,
                "email": email,
                "display_name": "Dup",
                "credential": "secret1"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["code"], "DUPLICATE_IDENTITY");
    }

    assert_eq!(AccountRepository::new(db.pool()).count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_validation() {
    let (server, _db) = create_test_server().await;

    // Credential too short
    let response = server
        .post("/api/register")
        .json(&json!({
            "national_id": "111",
            "email": "a@x.com",
            "display_name": "Ana",
            "credential": "12345"
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // Field-level details
    let response = server
        .post("/api/register")
        .json(&json!({
            "national_id": "111",
            "email": "not-an-email",
            "display_name": "Ana",
            "credential": "secret1"
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["email"].is_array());
}

#[tokio::test]
async fn test_register_trims_padded_email() {
    let (server, _db) = create_test_server().await;

    let body = register(&server, "111", "  Ana@X.com ", "secret1").await;
    assert_eq!(body["data"]["account"]["email"], "ana@x.com");

    login(&server, "ana@x.com", "secret1").await;
}

#[tokio::test]
async fn test_register_rejects_unknown_and_missing_fields() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/register")
        .json(&json!({
            "national_id": "111",
            "email": "a@x.com",
            "display_name": "Ana",
            "credential": "secret1",
            "password_hash": "$argon2id$forged"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "BAD_REQUEST");

    let response = server
        .post("/api/register")
        .json(&json!({"national_id": "111", "email": "a@x.com"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_elevated_role_requires_admin() {
    let (server, db) = create_test_server().await;

    let request = json!({
        "national_id": "333",
        "email": "staff@x.com",
        "display_name": "New Staff",
        "credential": "secret1",
        "role": "staff"
    });

    let response = server.post("/api/register").json(&request).await;
    response.assert_status(StatusCode::FORBIDDEN);

    let (_, admin_token) = common::seed_and_login(&server, &db, "admin1", Role::Admin).await;
    let response = server
        .post("/api/register")
        .add_header(AUTHORIZATION, bearer(&admin_token))
        .json(&request)
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["data"]["account"]["role"], "staff");
}

// ============================================================================
// Access-control gate
// ============================================================================

#[tokio::test]
async fn test_profile_requires_token() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/profile").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "UNAUTHENTICATED");

    let response = get_auth(&server, "/api/profile", "garbage").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "TOKEN_MALFORMED");
}

#[tokio::test]
async fn test_token_expires() {
    let mut config = test_config();
    config.auth.token_ttl_secs = 1;
    let (server, _db) = create_test_server_with(config).await;

    let body = register(&server, "111", "a@x.com", "secret1").await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    get_auth(&server, "/api/profile", &token)
        .await
        .assert_status_ok();

    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;

    let response = get_auth(&server, "/api/profile", &token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_disabled_account_is_rejected() {
    let (server, db) = create_test_server().await;
    let body = register(&server, "111", "a@x.com", "secret1").await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let id = body["data"]["account"]["id"].as_i64().unwrap();

    AccountRepository::new(db.pool())
        .set_active(id, false)
        .await
        .unwrap();

    let response = server
        .post("/api/login")
        .json(&json!({"identifier": "a@x.com", "credential": "secret1"}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // The token is still well-formed, but the profile check sees the flag
    get_auth(&server, "/api/profile", &token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// ============================================================================
// Profile update
// ============================================================================

#[tokio::test]
async fn test_update_own_account() {
    let (server, _db) = create_test_server().await;
    let body = register(&server, "111", "a@x.com", "secret1").await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let id = body["data"]["account"]["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/api/accounts/{}", id))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({
            "display_name": "Ana Renamed",
            "phone": "",
            "credential": "newsecret"
        }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["display_name"], "Ana Renamed");

    login(&server, "a@x.com", "newsecret").await;
    server
        .post("/api/login")
        .json(&json!({"identifier": "a@x.com", "credential": "secret1"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_other_account_forbidden() {
    let (server, _db) = create_test_server().await;
    let a = register(&server, "111", "a@x.com", "secret1").await;
    let b = register(&server, "222", "b@x.com", "secret1").await;
    let token_a = a["data"]["token"].as_str().unwrap().to_string();
    let id_b = b["data"]["account"]["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/api/accounts/{}", id_b))
        .add_header(AUTHORIZATION, bearer(&token_a))
        .json(&json!({"display_name": "Hijacked"}))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    // Taking another account's email
    let id_a = a["data"]["account"]["id"].as_i64().unwrap();
    let response = server
        .put(&format!("/api/accounts/{}", id_a))
        .add_header(AUTHORIZATION, bearer(&token_a))
        .json(&json!({"email": "B@x.com"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "DUPLICATE_IDENTITY");

    // Self-promotion
    let response = server
        .put(&format!("/api/accounts/{}", id_a))
        .add_header(AUTHORIZATION, bearer(&token_a))
        .json(&json!({"role": "admin"}))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

// ============================================================================
// Password reset
// ============================================================================

#[tokio::test]
async fn test_forgot_password_response_is_identical() {
    let (server, _db) = create_test_server().await;
    register(&server, "111", "a@x.com", "secret1").await;

    let known = server
        .post("/api/forgot-password")
        .json(&json!({"identifier": "a@x.com"}))
        .await;
    let unknown = server
        .post("/api/forgot-password")
        .json(&json!({"identifier": "ghost@x.com"}))
        .await;

    known.assert_status_ok();
    unknown.assert_status_ok();
    assert_eq!(known.status_code(), unknown.status_code());
    assert_eq!(known.text(), unknown.text());
}

#[tokio::test]
async fn test_reset_password_flow() {
    let (server, db) = create_test_server().await;
    register(&server, "111", "a@x.com", "secret1").await;

    let repo = AccountRepository::new(db.pool());
    let issued = request_password_reset(&repo, "111", chrono::Duration::hours(1), chrono::Utc::now())
        .await
        .unwrap()
        .expect("reset issued");

    let response = server
        .get(&format!("/api/validate-token/{}", issued.token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["valid"], true);

    server
        .post(&format!("/api/reset-password/{}", issued.token))
        .json(&json!({"new_credential": "brandnew"}))
        .await
        .assert_status_ok();

    login(&server, "a@x.com", "brandnew").await;

    // Single use
    let response = server
        .get(&format!("/api/validate-token/{}", issued.token))
        .await;
    assert_eq!(response.json::<Value>()["data"]["valid"], false);

    let response = server
        .post(&format!("/api/reset-password/{}", issued.token))
        .json(&json!({"new_credential": "again123"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "INVALID_OR_EXPIRED_TOKEN"
    );
}

#[tokio::test]
async fn test_expired_reset_token_leaves_hash_untouched() {
    let (server, db) = create_test_server().await;
    register(&server, "111", "a@x.com", "secret1").await;

    let repo = AccountRepository::new(db.pool());
    let before = repo.find_by_email("a@x.com").await.unwrap().unwrap();

    let two_hours_ago = chrono::Utc::now() - chrono::Duration::hours(2);
    let issued = request_password_reset(&repo, "a@x.com", chrono::Duration::hours(1), two_hours_ago)
        .await
        .unwrap()
        .expect("reset issued");

    let response = server
        .get(&format!("/api/validate-token/{}", issued.token))
        .await;
    assert_eq!(response.json::<Value>()["data"]["valid"], false);

    let response = server
        .post(&format!("/api/reset-password/{}", issued.token))
        .json(&json!({"new_credential": "brandnew"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "INVALID_OR_EXPIRED_TOKEN"
    );

    let after = repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(before.password_hash.as_str(), after.password_hash.as_str());
    login(&server, "a@x.com", "secret1").await;
}

#[tokio::test]
async fn test_reset_token_void_after_account_disabled() {
    let (server, db) = create_test_server().await;
    let body = register(&server, "111", "a@x.com", "secret1").await;
    let id = body["data"]["account"]["id"].as_i64().unwrap();

    let repo = AccountRepository::new(db.pool());
    let issued = request_password_reset(&repo, "111", chrono::Duration::hours(1), chrono::Utc::now())
        .await
        .unwrap()
        .expect("reset issued");

    let (_, admin_token) = common::seed_and_login(&server, &db, "admin1", Role::Admin).await;
    for active in [false, true] {
        server
            .put(&format!("/api/accounts/{}/status", id))
            .add_header(AUTHORIZATION, bearer(&admin_token))
            .json(&json!({"active": active}))
            .await
            .assert_status_ok();
    }

    let response = server
        .post(&format!("/api/reset-password/{}", issued.token))
        .json(&json!({"new_credential": "brandnew"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "INVALID_OR_EXPIRED_TOKEN"
    );
    login(&server, "a@x.com", "secret1").await;
}

#[tokio::test]
async fn test_reset_with_unknown_token() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/reset-password/deadbeef")
        .json(&json!({"new_credential": "brandnew"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rate_limited() {
    let mut config = test_config();
    config.web.login_rate_limit = 2;
    let (server, _db) = create_test_server_with(config).await;

    let attempt = || {
        server
            .post("/api/login")
            .json(&json!({"identifier": "a@x.com", "credential": "secret1"}))
    };

    attempt().await.assert_status(StatusCode::NOT_FOUND);
    attempt().await.assert_status(StatusCode::NOT_FOUND);
    let response = attempt().await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json::<Value>()["error"]["code"], "TOO_MANY_REQUESTS");
}
