use serde::Deserialize;
use service_core::config::{load_settings, ServerSettings, TelemetrySettings};

pub const SERVICE_NAME: &str = "claims-hook";

/// Process-level settings. The per-login secrets travel on the event itself
/// (see [`crate::models::EventSecrets`]).
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    load_settings(SERVICE_NAME)
}
