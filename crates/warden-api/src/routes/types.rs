//! Request/Response DTOs

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::{Deserialize, Serialize};
use warden_db::User;

use crate::error::ApiError;

// ==================== Request Types ====================

/// `{username, password}` body shared by registration, update and login
///
/// Both fields are optional at the wire level so that a missing field is
/// reported by the handler instead of as a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Username and password that passed the presence checks
#[derive(Debug)]
pub struct ValidCredentials {
    pub username: String,
    pub password: String,
}

impl CredentialsBody {
    /// Require both fields, username first
    pub fn require(self) -> Result<ValidCredentials, ApiError> {
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Username is required.".to_string()))?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Password is required.".to_string()))?;

        Ok(ValidCredentials { username, password })
    }
}

/// Extractor accepting the credentials body as JSON or as a url-encoded form
pub struct Credentials(pub CredentialsBody);

impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let body = if is_form {
            let Form(body) = Form::<CredentialsBody>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            body
        } else {
            let Json(body) = Json::<CredentialsBody>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            body
        };

        Ok(Credentials(body))
    }
}

// ==================== Response Types ====================

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// User record as returned by the API
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            password_hash: user.password_hash,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}
