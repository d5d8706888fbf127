use crate::config::GatewaySettings;
use crate::error::PortalError;
use crate::models::{ApiQuery, OrganisationsResponse, Organization};
use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};
use service_core::observability::PropagateTrace;

/// Raw answer from the protected gateway, passed back to the caller.
#[derive(Debug)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Client for the backend behind the API gateway, authenticated with the
/// user's own bearer token.
pub struct GatewayClient {
    client: Client,
    settings: GatewaySettings,
}

impl GatewayClient {
    pub fn new(client: Client, settings: GatewaySettings) -> Self {
        Self { client, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url().is_some()
    }

    fn base_url(&self) -> Option<&str> {
        self.settings
            .api_gateway
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    fn url(&self, path: &str) -> Result<String, PortalError> {
        self.base_url()
            .map(|base| format!("{}{}", base, path))
            .ok_or(PortalError::GatewayNotConfigured)
    }

    async fn post_json(
        &self,
        path: &str,
        access_token: &str,
        body: &Value,
    ) -> Result<reqwest::Response, PortalError> {
        let url = self.url(path)?;

        self.client
            .post(&url)
            .propagate_trace()
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                PortalError::Backend(e.to_string())
            })
    }

    /// Organizations the user belongs to, in backend order.
    pub async fn list_organisations(
        &self,
        access_token: &str,
        user_email: &str,
    ) -> Result<Vec<Organization>, PortalError> {
        let response = self
            .post_json(
                "/auth/organisations",
                access_token,
                &json!({ "user_email": user_email }),
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::Backend(format!(
                "Listing organisations failed with status: {}",
                status.as_u16()
            )));
        }

        let body: OrganisationsResponse = response
            .json()
            .await
            .map_err(|e| PortalError::Backend(format!("Invalid organisations response: {}", e)))?;

        Ok(body.into_organizations())
    }

    /// Ask the backend to authorize an upcoming switch.
    pub async fn prepare_switch(
        &self,
        access_token: &str,
        organisation_id: &str,
        user_email: &str,
    ) -> Result<(), PortalError> {
        let response = self
            .post_json(
                "/auth/prepare-switch",
                access_token,
                &json!({ "organisation_id": organisation_id, "user_email": user_email }),
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PortalError::Backend(format!(
                "Prepare-switch failed with status: {}",
                status.as_u16()
            )))
        }
    }

    /// Forward a validated query verbatim to `/public`.
    pub async fn call_public(
        &self,
        access_token: &str,
        query: ApiQuery,
    ) -> Result<GatewayResponse, PortalError> {
        let url = self.url("/public")?;

        let response = self
            .client
            .post(&url)
            .propagate_trace()
            .bearer_auth(access_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(query.into_body())
            .send()
            .await
            .map_err(|e| PortalError::Backend(e.to_string()))?;

        let status = response.status();
        let body = response
            .json()
            .await
            .map_err(|e| PortalError::Backend(e.to_string()))?;

        Ok(GatewayResponse { status, body })
    }
}
