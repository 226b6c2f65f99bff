//! Web API Medical History Tests

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use common::{bearer, create_test_server, get_auth, register, seed_and_login};
use leclat::Role;

fn intake(national_id: &str) -> Value {
    json!({
        "national_id": national_id,
        "general": {
            "full_name": "Ana Client",
            "age": 34,
            "birth_date": "1991-04-02",
            "occupation": "Nurse",
            "phone": "555-0101",
            "email": "ana@x.com",
            "reason": "Acne scars"
        },
        "lifestyle": {"stress": "Alto", "sleep_hours": 6},
        "facial_diagnosis": {"skin_type": "oily", "visual_observations": ["open pores"]}
    })
}

async fn create(server: &TestServer, token: &str, body: &Value) -> axum_test::TestResponse {
    server
        .post("/api/histories")
        .add_header(AUTHORIZATION, bearer(token))
        .json(body)
        .await
}

async fn customer_token(server: &TestServer, national_id: &str) -> String {
    let body = register(server, national_id, &format!("{}@x.com", national_id), "secret1").await;
    body["data"]["token"].as_str().unwrap().to_string()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_staff_files_history() {
    let (server, db) = create_test_server().await;
    customer_token(&server, "111").await;
    let (_, staff_token) = seed_and_login(&server, &db, "staff1", Role::Staff).await;

    let response = create(&server, &staff_token, &intake("111")).await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["national_id"], "111");
    assert_eq!(body["data"]["lifestyle"]["stress"], "high");
    assert_eq!(body["data"]["lifestyle"]["sleep_hours"], 6);
    assert_eq!(body["data"]["facial_diagnosis"]["skin_type"], "oily");
    assert_eq!(body["data"]["treatment_plan"]["sessions"], 1);

    let response = create(&server, &staff_token, &intake("111")).await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_history_requires_existing_account() {
    let (server, db) = create_test_server().await;
    let (_, staff_token) = seed_and_login(&server, &db, "staff1", Role::Staff).await;

    let response = create(&server, &staff_token, &intake("999")).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_customer_cannot_file_history() {
    let (server, _db) = create_test_server().await;
    let token = customer_token(&server, "111").await;

    create(&server, &token, &intake("111"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_history_validation() {
    let (server, db) = create_test_server().await;
    customer_token(&server, "111").await;
    let (_, staff_token) = seed_and_login(&server, &db, "staff1", Role::Staff).await;

    let mut bad = intake("111");
    bad["general"]["birth_date"] = json!("02/04/1991");
    create(&server, &staff_token, &bad)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let mut sleepless = intake("111");
    sleepless["lifestyle"]["sleep_hours"] = json!(30);
    create(&server, &staff_token, &sleepless)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn test_history_read_access() {
    let (server, db) = create_test_server().await;
    let owner = customer_token(&server, "111").await;
    let other = customer_token(&server, "222").await;
    let (_, staff_token) = seed_and_login(&server, &db, "staff1", Role::Staff).await;
    create(&server, &staff_token, &intake("111")).await;

    let response = get_auth(&server, "/api/histories/national-id/111", &owner).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["general"]["full_name"], "Ana Client");

    get_auth(&server, "/api/histories/national-id/111", &other)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    get_auth(&server, "/api/histories/national-id/111", &staff_token)
        .await
        .assert_status_ok();
    get_auth(&server, "/api/histories/national-id/222", &staff_token)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    get_auth(&server, "/api/histories", &owner)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    let response = get_auth(&server, "/api/histories", &staff_token).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 1);

    server
        .get("/api/histories")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_history() {
    let (server, db) = create_test_server().await;
    customer_token(&server, "111").await;
    customer_token(&server, "222").await;
    let (_, staff_token) = seed_and_login(&server, &db, "staff1", Role::Staff).await;
    let id = create(&server, &staff_token, &intake("111")).await.json::<Value>()["data"]["id"]
        .as_i64()
        .unwrap();

    let response = server
        .put(&format!("/api/histories/{}", id))
        .add_header(AUTHORIZATION, bearer(&staff_token))
        .json(&json!({
            "treatment_plan": {"recommended_treatment": "Chemical peel", "sessions": 4}
        }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"]["treatment_plan"]["sessions"], 4);
    assert_eq!(body["data"]["general"]["occupation"], "Nurse");

    server
        .put(&format!("/api/histories/{}", id))
        .add_header(AUTHORIZATION, bearer(&staff_token))
        .json(&json!({"national_id": "999"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = server
        .put(&format!("/api/histories/{}", id))
        .add_header(AUTHORIZATION, bearer(&staff_token))
        .json(&json!({"national_id": "222"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["national_id"], "222");

    server
        .put("/api/histories/9999")
        .add_header(AUTHORIZATION, bearer(&staff_token))
        .json(&json!({"national_id": "222"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
