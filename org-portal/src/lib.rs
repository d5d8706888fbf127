pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use services::{GatewayClient, IdentityClient, OrgSwitcher};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityClient>,
    pub gateway: Arc<GatewayClient>,
    pub switcher: Arc<OrgSwitcher>,
}

impl AppState {
    pub fn new(identity: Arc<IdentityClient>, gateway: Arc<GatewayClient>, switcher: Arc<OrgSwitcher>) -> Self {
        Self {
            identity,
            gateway,
            switcher,
        }
    }
}
