//! User management routes

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    middleware,
    routing::{get, put},
};
use std::sync::Arc;
use tracing::{debug, info};
use warden_auth::{AuthUser, TokenCodec, auth_middleware};
use warden_db::{DbError, UserCredentials};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{Credentials, UserResponse};

/// GET /users (bearer token required)
async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    debug!("Listing users for {}", caller.username);

    let users = state
        .db
        .list_users()
        .await
        .map_err(|e| ApiError::internal("fetching users", e))?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /users
async fn create_user(
    State(state): State<AppState>,
    Credentials(body): Credentials,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let request = body.require()?;

    debug!("Creating user: {}", request.username);

    let password_hash = state
        .passwords
        .hash_blocking(request.password)
        .await
        .map_err(|e| ApiError::internal("creating user", e))?;

    let user = state
        .db
        .insert_user(UserCredentials {
            username: request.username,
            password_hash,
        })
        .await
        .map_err(|e| write_error("creating user", e))?;

    info!("Created user: {}", user.username);
    metrics::counter!("warden_users_created_total").increment(1);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// PUT /users/{id} (bearer token required)
///
/// Any authenticated caller may update any user. An id that is not an
/// integer names no user.
async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    Credentials(body): Credentials,
) -> Result<Json<UserResponse>, ApiError> {
    let request = body.require()?;
    let Path(id) = id.map_err(|e| {
        debug!("Unusable user id: {}", e);
        user_not_found()
    })?;

    debug!("User {} updating user {}", caller.username, id);

    let password_hash = state
        .passwords
        .hash_blocking(request.password)
        .await
        .map_err(|e| ApiError::internal("updating user", e))?;

    let user = state
        .db
        .update_user(
            id,
            UserCredentials {
                username: request.username,
                password_hash,
            },
        )
        .await
        .map_err(|e| write_error("updating user", e))?
        .ok_or_else(user_not_found)?;

    info!("Updated user: {} ({})", user.username, user.id);

    Ok(Json(UserResponse::from(user)))
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found.".to_string())
}

fn write_error(action: &str, err: DbError) -> ApiError {
    match err {
        DbError::Duplicate(_) => ApiError::Conflict("Username already exists.".to_string()),
        other => ApiError::internal(action, other),
    }
}

/// Create user routes; listing and update sit behind the bearer gate
pub fn routes(codec: Arc<TokenCodec>) -> Router<AppState> {
    let gate = middleware::from_fn_with_state(codec, auth_middleware);

    Router::new()
        .route(
            "/users",
            get(list_users).route_layer(gate.clone()).post(create_user),
        )
        .route("/users/{id}", put(update_user).route_layer(gate))
}
