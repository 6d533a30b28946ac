//! Integration tests for registration, login, and sessions.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p cadence-server)
//!
//! Run with: cargo test -p cadence-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::json;
use uuid::Uuid;

use cadence_integration_tests::{TEST_PASSWORD, TestUser, base_url, body_json};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_logs_the_account_in() {
    let user = TestUser::register("Alice").await;

    let resp = user.get("/api/auth/me").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["email"], user.email);
    assert_eq!(me["name"], "Alice");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_email_conflicts() {
    let user = TestUser::register("Alice").await;

    let resp = user
        .post(
            "/api/auth/register",
            &json!({"email": user.email, "name": "Imposter", "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_email_is_case_insensitive_for_login() {
    let user = TestUser::register("Alice").await;

    let resp = user
        .post(
            "/api/auth/login",
            &json!({"email": user.email.to_uppercase(), "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_wrong_password_rejected() {
    let user = TestUser::register("Alice").await;

    let resp = user
        .post(
            "/api/auth/login",
            &json!({"email": user.email, "password": "not-the-password"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_short_password_rejected() {
    let client = Client::new();
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": format!("short-{}@cadence.test", Uuid::new_v4()),
            "name": "Shorty",
            "password": "tiny"
        }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_logout_ends_the_session() {
    let user = TestUser::register("Alice").await;

    let resp = user.post("/api/auth/logout", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = user.get("/api/auth/me").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unauthenticated_requests_rejected() {
    let client = Client::new();
    let resp = client
        .get(format!("{}/api/notes", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
