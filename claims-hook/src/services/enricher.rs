use super::account_client::AccountResolverClient;
use super::identity_client::IdentityProviderClient;
use super::metrics::record_outcome;
use crate::claims::ClaimSet;
use crate::error::HookError;
use crate::models::{AccountLookupRequest, LoginEvent};
use reqwest::Client;
use tracing::instrument;

/// Post-login flow: mint a service credential, look the user up on the
/// backend, turn the answer into token claims.
#[derive(Clone)]
pub struct ClaimEnricher {
    identity: IdentityProviderClient,
    accounts: AccountResolverClient,
}

impl ClaimEnricher {
    pub fn new(client: Client) -> Self {
        Self {
            identity: IdentityProviderClient::new(client.clone()),
            accounts: AccountResolverClient::new(client),
        }
    }

    /// Never fails: any error is logged and the login proceeds without
    /// custom claims.
    #[instrument(skip_all, fields(organization_id = ?event.organization_id()))]
    pub async fn on_execute_post_login(&self, event: &LoginEvent) -> ClaimSet {
        match self.enrich(event).await {
            Ok(claims) => {
                record_outcome("enriched");
                claims
            }
            Err(e) => {
                match &e {
                    HookError::Configuration(missing) => {
                        tracing::error!(missing = ?missing, "Secrets not properly configured.")
                    }
                    HookError::UpstreamAuth(reason) => {
                        tracing::error!(reason = %reason, "Getting client_credentials failed")
                    }
                    HookError::Backend(reason) => {
                        tracing::error!(reason = %reason, "Backend hook failed")
                    }
                    HookError::Decode { .. } => {
                        tracing::error!(error = %e, "Error calling the backend context hook")
                    }
                }
                record_outcome(e.outcome());
                ClaimSet::default()
            }
        }
    }

    async fn enrich(&self, event: &LoginEvent) -> Result<ClaimSet, HookError> {
        let secrets = event.secrets.validate()?;

        let credential = self.identity.client_credentials(&secrets).await?;

        let lookup = AccountLookupRequest {
            user_email: event.user.email.clone(),
            organization_id: event.organization_id().map(str::to_string),
        };
        let context = self
            .accounts
            .resolve(&secrets.backend_url, &credential, &lookup)
            .await?;

        tracing::info!(
            account_id = %context.account_id,
            organisation_id = ?context.organisation_id(),
            roles = %context.roles,
            is_system_level = %context.is_system_level,
            "Resolved account context"
        );

        Ok(ClaimSet::from_account_context(&context))
    }
}
