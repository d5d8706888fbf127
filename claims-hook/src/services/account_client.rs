use super::identity_client::ServiceCredential;
use crate::error::HookError;
use crate::models::{AccountContext, AccountLookupRequest};
use reqwest::Client;
use service_core::observability::PropagateTrace;

/// Client for the backend account-context endpoint.
#[derive(Clone)]
pub struct AccountResolverClient {
    client: Client,
}

impl AccountResolverClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn resolve(
        &self,
        backend_url: &str,
        credential: &ServiceCredential,
        lookup: &AccountLookupRequest,
    ) -> Result<AccountContext, HookError> {
        let response = self
            .client
            .post(backend_url)
            .propagate_trace()
            .bearer_auth(credential.bearer())
            .json(lookup)
            .send()
            .await
            .map_err(|e| HookError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HookError::Backend(format!("status {}", status.as_u16())));
        }

        response.json().await.map_err(|e| HookError::Decode {
            what: "account context",
            source: e,
        })
    }
}
