use crate::config::IdentityProviderSettings;
use crate::error::PortalError;
use crate::models::{SessionTokens, TokenResponse, UserSession};
use crate::utils::now_unix;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::Serialize;
use service_core::observability::PropagateTrace;
use tracing::instrument;

/// Whether a token already held in the session may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    On,
    /// Always ask the identity provider for a fresh token.
    Off,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetTokenOptions<'a> {
    /// Scope the token to this organization.
    pub organization_id: Option<&'a str>,
    pub cache_mode: CacheMode,
}

#[derive(Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
enum TokenRequest<'a> {
    AuthorizationCode {
        client_id: &'a str,
        client_secret: &'a str,
        code: &'a str,
        redirect_uri: &'a str,
    },
    RefreshToken {
        client_id: &'a str,
        client_secret: &'a str,
        refresh_token: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        organization: Option<&'a str>,
    },
}

/// Client for the identity provider's authorize, token and logout endpoints.
pub struct IdentityClient {
    client: Client,
    settings: IdentityProviderSettings,
}

impl IdentityClient {
    pub fn new(client: Client, settings: IdentityProviderSettings) -> Self {
        Self { client, settings }
    }

    pub fn authorize_url(&self, state: &str, organization: Option<&str>) -> Result<Url, PortalError> {
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", self.settings.client_id.as_str()),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("audience", self.settings.audience.as_str()),
            ("scope", "openid profile email offline_access"),
            ("state", state),
        ];
        if let Some(org) = organization {
            params.push(("organization", org));
        }

        Url::parse_with_params(&self.settings.endpoint("/authorize"), &params)
            .map_err(|e| PortalError::IdentityProvider(format!("Invalid authorize URL: {}", e)))
    }

    pub fn logout_url(&self) -> Result<Url, PortalError> {
        Url::parse_with_params(
            &self.settings.endpoint("/v2/logout"),
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("returnTo", self.settings.logout_return_to.as_str()),
            ],
        )
        .map_err(|e| PortalError::IdentityProvider(format!("Invalid logout URL: {}", e)))
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, PortalError> {
        self.request_token(&TokenRequest::AuthorizationCode {
            client_id: &self.settings.client_id,
            client_secret: self.settings.client_secret.expose_secret(),
            code,
            redirect_uri: &self.settings.redirect_uri,
        })
        .await
    }

    pub async fn refresh(
        &self,
        refresh_token: &str,
        organization: Option<&str>,
    ) -> Result<TokenResponse, PortalError> {
        self.request_token(&TokenRequest::RefreshToken {
            client_id: &self.settings.client_id,
            client_secret: self.settings.client_secret.expose_secret(),
            refresh_token,
            organization,
        })
        .await
    }

    async fn request_token(&self, body: &TokenRequest<'_>) -> Result<TokenResponse, PortalError> {
        let url = self.settings.endpoint("/oauth/token");

        let response = self
            .client
            .post(&url)
            .propagate_trace()
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                PortalError::IdentityProvider(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "Token request rejected");
            return Err(PortalError::IdentityProvider(format!(
                "token request failed with status {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PortalError::IdentityProvider(format!("invalid token response: {}", e)))
    }

    /// Token for the current session without any user interaction.
    ///
    /// A cached, unexpired session token is returned as is unless the caller
    /// bypasses the cache or asks for a specific organization; otherwise the
    /// refresh token is exchanged. Without a refresh token the caller has to
    /// log in again.
    #[instrument(skip(self, session))]
    pub async fn get_access_token_silently(
        &self,
        session: &UserSession,
        options: GetTokenOptions<'_>,
    ) -> Result<String, PortalError> {
        let tokens = session.tokens().await?.ok_or(PortalError::LoginRequired)?;
        let now = now_unix();

        let reusable = options.cache_mode == CacheMode::On
            && options.organization_id.is_none()
            && !tokens.is_expired(now);
        if reusable {
            return Ok(tokens.access_token);
        }

        let refresh_token = tokens.refresh_token.ok_or(PortalError::LoginRequired)?;
        let response = self
            .refresh(&refresh_token, options.organization_id)
            .await?;
        let fresh = SessionTokens::from_response(response, now, Some(refresh_token));
        session.set_tokens(&fresh).await?;

        tracing::info!("Session token refreshed");
        Ok(fresh.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use serde_json::json;

    fn client() -> IdentityClient {
        IdentityClient::new(
            Client::new(),
            IdentityProviderSettings {
                domain: "https://tenant.example.com".to_string(),
                client_id: "portal".to_string(),
                client_secret: Secret::new("secret".to_string()),
                audience: "https://api.example.com".to_string(),
                redirect_uri: "http://localhost:9020/callback".to_string(),
                logout_return_to: "http://localhost:9020/".to_string(),
            },
        )
    }

    #[test]
    fn authorize_url_carries_state_and_organization() {
        let url = client().authorize_url("xyz", Some("org_2")).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/authorize");
        assert_eq!(params["state"], "xyz");
        assert_eq!(params["organization"], "org_2");
        assert_eq!(params["redirect_uri"], "http://localhost:9020/callback");
        assert!(params["scope"].contains("offline_access"));
    }

    #[test]
    fn logout_url_returns_to_portal() {
        let url = client().logout_url().unwrap();
        assert_eq!(url.path(), "/v2/logout");
        assert!(url.as_str().contains("returnTo=http%3A%2F%2Flocalhost%3A9020%2F"));
    }

    #[test]
    fn refresh_request_shape() {
        let body = TokenRequest::RefreshToken {
            client_id: "portal",
            client_secret: "secret",
            refresh_token: "rt",
            organization: Some("org_2"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "grant_type": "refresh_token",
                "client_id": "portal",
                "client_secret": "secret",
                "refresh_token": "rt",
                "organization": "org_2"
            })
        );
    }
}
