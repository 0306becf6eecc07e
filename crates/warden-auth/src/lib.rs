//! Warden Authentication
//!
//! Password hashing, signed bearer tokens, and the request gate that
//! admits or rejects requests based on the `Authorization` header.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, TokenCodec};
pub use middleware::{AuthUser, auth_middleware, authenticate, extract_bearer_token};
pub use password::{HashCost, PasswordService};
