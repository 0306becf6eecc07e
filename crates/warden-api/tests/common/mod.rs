//! Shared helpers for driving the router in-process

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use warden_api::{AppState, create_router};
use warden_auth::{HashCost, PasswordService, TokenCodec};
use warden_db::Database;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Router backed by a throwaway SQLite file
pub struct TestApp {
    pub router: Router,
    db_url: String,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_token_ttl(Duration::minutes(2)).await
    }

    pub async fn with_token_ttl(ttl: Duration) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("warden.db").display());
        let db = Database::new(&url, 4).await.expect("Failed to open database");

        let codec = Arc::new(TokenCodec::new(TEST_SECRET, ttl).expect("Failed to build codec"));
        let passwords = PasswordService::new(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password service");

        let router = create_router(AppState::new(db, codec, passwords), None);

        Self {
            router,
            db_url: url,
            _dir: dir,
        }
    }

    /// Drop the users table from under the running app
    pub async fn drop_users_table(&self) {
        let pool = sqlx::SqlitePool::connect(&self.db_url)
            .await
            .expect("Failed to open side connection");
        sqlx::query("DROP TABLE users")
            .execute(&pool)
            .await
            .expect("Failed to drop users table");
        pool.close().await;
    }

    /// Send a request; the body, if any, is JSON
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, bytes.to_vec())
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, authorization, body).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/users",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create {}: {}", username, body);
        body
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {}: {}", username, body);
        body["token"]
            .as_str()
            .expect("token is a string")
            .to_string()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
