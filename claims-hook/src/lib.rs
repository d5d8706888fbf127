pub mod claims;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::ClaimEnricher;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<ClaimEnricher>,
}

impl AppState {
    pub fn new(enricher: Arc<ClaimEnricher>) -> Self {
        Self { enricher }
    }
}
