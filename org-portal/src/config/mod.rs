use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{load_settings, ServerSettings, TelemetrySettings};

pub const SERVICE_NAME: &str = "org-portal";

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    pub identity: IdentityProviderSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub switch: SwitchSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Deserialize, Clone)]
pub struct IdentityProviderSettings {
    /// Tenant base URL, e.g. `https://tenant.eu.auth0.com`.
    pub domain: String,
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub audience: String,
    /// Where the identity provider sends the browser back after login.
    pub redirect_uri: String,
    /// Where the identity provider sends the browser after logout.
    pub logout_return_to: String,
}

impl IdentityProviderSettings {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.domain.trim_end_matches('/'), path)
    }
}

#[derive(Deserialize, Clone, Default)]
pub struct GatewaySettings {
    /// Base URL of the API gateway. Calls through the gateway are refused
    /// while it is unset.
    #[serde(default)]
    pub api_gateway: Option<String>,
}

#[derive(Deserialize, Clone, Default)]
pub struct SwitchSettings {
    /// When set, a failed prepare-switch call stops the switch before a new
    /// token is requested. Otherwise the outcome is only logged.
    #[serde(default)]
    pub require_switch_approval: bool,
}

#[derive(Deserialize, Clone)]
pub struct SessionSettings {
    #[serde(default)]
    pub secure_cookies: bool,
    #[serde(default = "default_inactivity_hours")]
    pub inactivity_hours: i64,
}

fn default_inactivity_hours() -> i64 {
    24
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secure_cookies: false,
            inactivity_hours: default_inactivity_hours(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    load_settings(SERVICE_NAME)
}
