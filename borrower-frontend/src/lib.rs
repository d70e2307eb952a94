pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::DeedApiClient;
use std::sync::Arc;

/// Shared application state containing service clients
#[derive(Clone)]
pub struct AppState {
    pub deed_api: Arc<DeedApiClient>,
}

impl AppState {
    pub fn new(deed_api: Arc<DeedApiClient>) -> Self {
        Self { deed_api }
    }
}
