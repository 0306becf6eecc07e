//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No usable bearer credential on the request
    #[error("Missing or malformed bearer credential")]
    Unauthenticated,

    /// A credential was presented but did not verify
    #[error("Invalid or expired token")]
    Forbidden,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Token lifetime puts expiry out of range")]
    TokenLifetime,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden | AuthError::InvalidToken | AuthError::TokenExpired => {
                StatusCode::FORBIDDEN
            }
            AuthError::EmptySecret
            | AuthError::TokenLifetime
            | AuthError::PasswordHash(_)
            | AuthError::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "Unauthorized",
            AuthError::Forbidden | AuthError::InvalidToken | AuthError::TokenExpired => "Forbidden",
            AuthError::InvalidCredentials => "Invalid username or password.",
            AuthError::EmptySecret
            | AuthError::TokenLifetime
            | AuthError::PasswordHash(_)
            | AuthError::Jwt(_) => "Internal error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = axum::Json(json!({
            "error": self.public_message()
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_and_invalid_tokens_look_the_same() {
        for err in [AuthError::Forbidden, AuthError::InvalidToken, AuthError::TokenExpired] {
            assert_eq!(err.status(), StatusCode::FORBIDDEN);
            assert_eq!(err.public_message(), "Forbidden");
        }
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = AuthError::PasswordHash("salt: invalid length".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal error");
    }
}
