use crate::error::HookError;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::collections::HashMap;

/// Details about the user and the context in which they are logging in,
/// as posted by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginEvent {
    pub user: LoginUser,
    #[serde(default)]
    pub request: LoginRequest,
    #[serde(default)]
    pub secrets: EventSecrets,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub query: HashMap<String, String>,
}

/// Secrets configured on the hook. Each one may be absent on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSecrets {
    #[serde(rename = "BACKEND_URL", default)]
    pub backend_url: Option<String>,
    #[serde(rename = "DOMAIN", default)]
    pub domain: Option<String>,
    #[serde(rename = "CLIENT_ID", default)]
    pub client_id: Option<String>,
    #[serde(rename = "CLIENT_SECRET", default)]
    pub client_secret: Option<Secret<String>>,
    #[serde(rename = "AUDIENCE", default)]
    pub audience: Option<String>,
}

/// The secrets bundle once all five values are known to be present.
#[derive(Debug, Clone)]
pub struct HookSecrets {
    pub backend_url: String,
    pub domain: String,
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub audience: String,
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

impl EventSecrets {
    pub fn validate(&self) -> Result<HookSecrets, HookError> {
        let backend_url = present(&self.backend_url);
        let domain = present(&self.domain);
        let client_id = present(&self.client_id);
        let client_secret = self
            .client_secret
            .as_ref()
            .filter(|s| !s.expose_secret().is_empty())
            .cloned();
        let audience = present(&self.audience);

        match (backend_url, domain, client_id, client_secret, audience) {
            (Some(backend_url), Some(domain), Some(client_id), Some(client_secret), Some(audience)) => {
                Ok(HookSecrets {
                    backend_url,
                    domain,
                    client_id,
                    client_secret,
                    audience,
                })
            }
            (backend_url, domain, client_id, client_secret, audience) => {
                let missing = [
                    ("BACKEND_URL", backend_url.is_none()),
                    ("DOMAIN", domain.is_none()),
                    ("CLIENT_ID", client_id.is_none()),
                    ("CLIENT_SECRET", client_secret.is_none()),
                    ("AUDIENCE", audience.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();
                Err(HookError::Configuration(missing))
            }
        }
    }
}

impl HookSecrets {
    /// `{DOMAIN}/oauth/token`. A bare tenant host is taken to be https.
    pub fn token_url(&self) -> String {
        let domain = self.domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            format!("{}/oauth/token", domain)
        } else {
            format!("https://{}/oauth/token", domain)
        }
    }
}

impl LoginEvent {
    /// Organization requested by the frontend on the authorize call, if any.
    pub fn organization_id(&self) -> Option<&str> {
        self.request
            .query
            .get("organization_id")
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}
