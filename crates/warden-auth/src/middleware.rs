//! Bearer-token gate for Axum
//!
//! [`authenticate`] holds the whole contract and is pure: no credential
//! means [`AuthError::Unauthenticated`] (401), a credential that does not
//! verify means [`AuthError::Forbidden`] (403). [`auth_middleware`] applies
//! it to a request and attaches the identity as an [`AuthUser`] extension.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::AuthError;
use crate::jwt::{Claims, TokenCodec};

const BEARER_SCHEME: &str = "Bearer";

/// Authenticated caller, attached to request extensions by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

impl AuthUser {
    /// Create from token claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            username: claims.username,
        }
    }
}

/// Extract the credential from an `Authorization` header value
///
/// The value must be `Bearer <token>`, scheme matched case-insensitively.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.map(str::trim).ok_or(AuthError::Unauthenticated)?;

    let (scheme, credential) = header
        .split_once(char::is_whitespace)
        .ok_or(AuthError::Unauthenticated)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::Unauthenticated);
    }

    let token = credential.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }

    Ok(token)
}

/// Decide whether a request carrying this header value is admitted
pub fn authenticate(header: Option<&str>, codec: &TokenCodec) -> Result<Claims, AuthError> {
    let token = extract_bearer_token(header)?;

    codec.verify(token).map_err(|e| {
        debug!("Bearer token refused: {}", e);
        AuthError::Forbidden
    })
}

/// Authentication middleware
///
/// Rejects the request unless it carries a valid bearer token; on success
/// the caller is available to handlers as [`AuthUser`].
pub async fn auth_middleware(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // A header that is not visible ASCII counts as no header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let claims = authenticate(auth_header, &codec).inspect_err(|e| {
        let reason = match e {
            AuthError::Unauthenticated => "unauthenticated",
            _ => "forbidden",
        };
        metrics::counter!("warden_gate_rejections_total", "reason" => reason).increment(1);
    })?;

    let user = AuthUser::from_claims(claims);
    debug!("Authenticated user: {}", user.username);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}
