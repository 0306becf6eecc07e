//! Application state

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use warden_auth::{PasswordService, TokenCodec};
use warden_db::Database;

/// Handle used to render the Prometheus scrape endpoint
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
///
/// Everything here is immutable for the life of the process.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub codec: Arc<TokenCodec>,
    pub passwords: PasswordService,
}

impl AppState {
    pub fn new(db: Database, codec: Arc<TokenCodec>, passwords: PasswordService) -> Self {
        Self {
            db,
            codec,
            passwords,
        }
    }
}
