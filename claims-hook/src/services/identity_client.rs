use crate::error::HookError;
use crate::models::HookSecrets;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::observability::PropagateTrace;

/// Machine-to-machine bearer token. Lives for one hook invocation.
#[derive(Debug)]
pub struct ServiceCredential(Secret<String>);

impl ServiceCredential {
    pub fn bearer(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Serialize)]
struct ClientCredentialsRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Client for the identity provider's token endpoint.
#[derive(Clone)]
pub struct IdentityProviderClient {
    client: Client,
}

impl IdentityProviderClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client-credentials grant against `{DOMAIN}/oauth/token`.
    pub async fn client_credentials(
        &self,
        secrets: &HookSecrets,
    ) -> Result<ServiceCredential, HookError> {
        let url = secrets.token_url();
        let body = ClientCredentialsRequest {
            grant_type: "client_credentials",
            client_id: &secrets.client_id,
            client_secret: secrets.client_secret.expose_secret(),
            audience: &secrets.audience,
        };

        let response = self
            .client
            .post(&url)
            .propagate_trace()
            .json(&body)
            .send()
            .await
            .map_err(|e| HookError::UpstreamAuth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HookError::UpstreamAuth(format!("status {}", status.as_u16())));
        }

        let token: TokenResponse = response.json().await.map_err(|e| HookError::Decode {
            what: "client_credentials response",
            source: e,
        })?;

        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(|t| ServiceCredential(Secret::new(t)))
            .ok_or_else(|| HookError::UpstreamAuth("response carried no access_token".to_string()))
    }
}
