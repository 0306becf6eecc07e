//! Bearer token issuance and verification

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Identity carried inside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
}

/// Signed payload: the claims plus issued-at and expiry
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    username: String,
    /// Issued at (Unix timestamp)
    iat: i64,
    /// Expiration time (Unix timestamp)
    exp: i64,
}

/// Signs and verifies bearer tokens
///
/// Both keys come from the same secret and both directions use the same
/// algorithm, so a token this codec issues is one it will accept until
/// `exp` passes.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec for the given secret and token lifetime
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for the given identity
    pub fn issue(&self, claims: &Claims) -> Result<String, AuthError> {
        self.issue_at(claims, Utc::now())
    }

    fn issue_at(&self, claims: &Claims, now: DateTime<Utc>) -> Result<String, AuthError> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::TokenLifetime)?;

        let token_claims = TokenClaims {
            username: claims.username.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        debug!("Issuing token for user: {}", claims.username);

        encode(&Header::new(ALGORITHM), &token_claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Verify a token and return its claims
    ///
    /// A bad signature, an undecodable token and an expired token are all
    /// errors; none of them panic. A token is valid strictly before `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    debug!("Token rejected: {}", e);
                    AuthError::InvalidToken
                }
            })?;

        // jsonwebtoken still accepts a token at exactly `exp`
        if token_data.claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(Claims {
            username: token_data.claims.username,
        })
    }
}
