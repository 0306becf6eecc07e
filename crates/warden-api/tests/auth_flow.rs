mod common;

use axum::http::{Method, StatusCode};
use chrono::Duration;
use common::{TEST_SECRET, TestApp, bearer};
use serde_json::json;
use warden_auth::{Claims, TokenCodec};

#[tokio::test]
async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
    let app = TestApp::new().await;
    app.create_user("alice", "pw1").await;

    let (unknown_status, unknown_body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": "nobody", "password": "pw1" })),
        )
        .await;
    let (wrong_status, wrong_body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong" })),
        )
        .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(unknown_body, wrong_body);
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&wrong_body).unwrap(),
        json!({ "error": "Invalid username or password." })
    );
}

#[tokio::test]
async fn test_login_with_missing_fields_is_unauthorized() {
    let app = TestApp::new().await;
    app.create_user("alice", "pw1").await;

    let (status, body) = app
        .send_json(Method::POST, "/login", None, Some(json!({ "username": "alice" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid username or password." }));
}

#[tokio::test]
async fn test_issued_token_is_accepted() {
    let app = TestApp::new().await;
    app.create_user("alice", "pw1").await;

    let token = app.login("alice", "pw1").await;
    let claims = TokenCodec::new(TEST_SECRET, Duration::minutes(2))
        .unwrap()
        .verify(&token)
        .unwrap();
    assert_eq!(claims.username, "alice");

    let (status, _) = app
        .send(Method::GET, "/users", Some(&bearer(&token)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_forbidden() {
    // Tokens from this app are already past their expiry when issued
    let app = TestApp::with_token_ttl(Duration::seconds(-5)).await;
    app.create_user("alice", "pw1").await;
    let token = app.login("alice", "pw1").await;

    let (status, body) = app
        .send_json(Method::GET, "/users", Some(&bearer(&token)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Forbidden" }));
}

#[tokio::test]
async fn test_foreign_secret_rejected_like_expired() {
    let app = TestApp::new().await;
    let foreign = TokenCodec::new(b"not-the-server-secret", Duration::minutes(2))
        .unwrap()
        .issue(&Claims {
            username: "alice".to_string(),
        })
        .unwrap();

    let expired_app = TestApp::with_token_ttl(Duration::seconds(-5)).await;
    expired_app.create_user("alice", "pw1").await;
    let expired = expired_app.login("alice", "pw1").await;

    let (foreign_status, foreign_body) = app
        .send(Method::GET, "/users", Some(&bearer(&foreign)), None)
        .await;
    let (expired_status, expired_body) = expired_app
        .send(Method::GET, "/users", Some(&bearer(&expired)), None)
        .await;

    assert_eq!(foreign_status, StatusCode::FORBIDDEN);
    assert_eq!(foreign_status, expired_status);
    assert_eq!(foreign_body, expired_body);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthenticated() {
    let app = TestApp::new().await;

    for header in ["Basic YWxpY2U6cHcx", "Bearer", "Bearer    "] {
        let (status, _) = app.send(Method::GET, "/users", Some(header), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", header);
    }
}
