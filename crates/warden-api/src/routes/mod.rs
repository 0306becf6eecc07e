//! API routes

mod auth;
mod health;
pub mod metrics;
pub mod types;
mod users;

use axum::{Router, response::Html, routing::get};

use crate::state::{AppState, MetricsHandle};

const API_DOCUMENTATION: &str = r#"<h1>API Documentation</h1>
<ul>
  <li>GET /users - List all users (requires a bearer token)</li>
  <li>POST /users - Create a new user</li>
  <li>PUT /users/:id - Update an existing user (requires a bearer token)</li>
  <li>POST /login - Log in and receive a bearer token</li>
</ul>"#;

/// GET /
async fn documentation() -> Html<&'static str> {
    Html(API_DOCUMENTATION)
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<MetricsHandle>) -> Router {
    let mut router = Router::new()
        .route("/", get(documentation))
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::routes(state.codec.clone()))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}
