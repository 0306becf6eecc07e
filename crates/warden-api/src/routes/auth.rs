//! Login route

use axum::{Json, Router, extract::State, routing::post};
use tracing::{debug, info, warn};
use warden_auth::{AuthError, Claims};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{Credentials, LoginResponse};

/// POST /login
///
/// An unknown username and a wrong password produce the same response, and
/// both run a full password verification.
async fn login(
    State(state): State<AppState>,
    Credentials(body): Credentials,
) -> Result<Json<LoginResponse>, ApiError> {
    // Login has no 400: a missing field simply cannot match
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    debug!("Login attempt for user: {}", username);

    let user = state
        .db
        .get_user_by_username(&username)
        .await
        .map_err(|e| ApiError::internal("logging in", e))?;

    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password_valid = state
        .passwords
        .verify_login_blocking(password, stored_hash)
        .await
        .map_err(|e| ApiError::internal("logging in", e))?;

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => {
            warn!("Failed login for user: {}", username);
            metrics::counter!("warden_logins_total", "outcome" => "rejected").increment(1);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let token = state
        .codec
        .issue(&Claims {
            username: user.username.clone(),
        })
        .map_err(|e| ApiError::internal("logging in", e))?;

    info!("User {} logged in successfully", user.username);
    metrics::counter!("warden_logins_total", "outcome" => "accepted").increment(1);

    Ok(Json(LoginResponse { token }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
