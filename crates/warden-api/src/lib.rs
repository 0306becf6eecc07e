//! Warden REST API
//!
//! This crate provides the Axum-based HTTP API: account registration,
//! listing and update, and password login.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
