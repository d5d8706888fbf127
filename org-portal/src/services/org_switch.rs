use super::gateway_client::GatewayClient;
use super::identity_client::{CacheMode, GetTokenOptions, IdentityClient};
use super::metrics::record_switch;
use crate::error::PortalError;
use crate::models::{Organization, OrganizationsView, SessionTokens, SwitchReport, SwitchStatus, UserSession};
use crate::utils::jwt::{active_organization, decode_jwt_claims};
use std::sync::Arc;
use tracing::instrument;

/// Organization named by the session tokens: access token first, then the
/// id token (which carries the same claims for display).
pub fn active_org_from_tokens(tokens: &SessionTokens) -> Option<String> {
    std::iter::once(tokens.access_token.as_str())
        .chain(tokens.id_token.as_deref())
        .filter_map(|token| decode_jwt_claims(token).ok())
        .find_map(|claims| active_organization(&claims))
}

/// Lists a user's organizations and moves the session between them.
pub struct OrgSwitcher {
    identity: Arc<IdentityClient>,
    gateway: Arc<GatewayClient>,
    require_switch_approval: bool,
}

impl OrgSwitcher {
    pub fn new(
        identity: Arc<IdentityClient>,
        gateway: Arc<GatewayClient>,
        require_switch_approval: bool,
    ) -> Self {
        Self {
            identity,
            gateway,
            require_switch_approval,
        }
    }

    /// Never fails: a listing error becomes the view's message.
    #[instrument(skip_all)]
    pub async fn list_organizations(&self, session: &UserSession, user_email: &str) -> OrganizationsView {
        let mut view = OrganizationsView::default();

        match self.try_list(session, user_email).await {
            Ok((active_org, organisations)) => {
                view.active_org = active_org;
                view.organisations = organisations;
                view.message = session
                    .last_switch()
                    .await
                    .ok()
                    .flatten()
                    .map(|report| report.message);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list organisations");
                view.active_org = session.active_org().await.ok().flatten();
                view.message = Some(e.to_string());
            }
        }

        view
    }

    async fn try_list(
        &self,
        session: &UserSession,
        user_email: &str,
    ) -> Result<(Option<String>, Vec<Organization>), PortalError> {
        let token = self
            .identity
            .get_access_token_silently(session, GetTokenOptions::default())
            .await?;

        let active_org = decode_jwt_claims(&token)
            .ok()
            .and_then(|claims| active_organization(&claims));
        let active_org = match active_org {
            Some(org) => Some(org),
            None => session.active_org().await?,
        };

        let organisations = self.gateway.list_organisations(&token, user_email).await?;
        tracing::info!(count = organisations.len(), "Listed organisations");

        Ok((active_org, organisations))
    }

    /// Runs `switching -> success | failed`. The active organization is
    /// cleared up front and only set again on success.
    #[instrument(skip(self, session, user_email))]
    pub async fn switch_organization(
        &self,
        session: &UserSession,
        user_email: &str,
        organization_id: &str,
    ) -> SwitchReport {
        let pending = SwitchReport::switching(organization_id);
        tracing::info!("{}", pending.message);

        if let Err(e) = self.begin_switch(session, &pending).await {
            return self.finish(session, SwitchReport::failed(e)).await;
        }

        let report = match self.try_switch(session, user_email, organization_id).await {
            Ok(active_org) => {
                match session.set_active_org(Some(&active_org)).await {
                    Ok(()) => SwitchReport::success(active_org),
                    Err(e) => SwitchReport::failed(e),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Organization switch failed");
                SwitchReport::failed(e)
            }
        };

        self.finish(session, report).await
    }

    async fn begin_switch(&self, session: &UserSession, pending: &SwitchReport) -> Result<(), PortalError> {
        session.set_active_org(None).await?;
        session.set_last_switch(pending).await
    }

    async fn finish(&self, session: &UserSession, report: SwitchReport) -> SwitchReport {
        if let Err(e) = session.set_last_switch(&report).await {
            tracing::warn!(error = %e, "Failed to store switch status");
        }
        record_switch(match report.status {
            SwitchStatus::Success => "success",
            _ => "failed",
        });
        report
    }

    async fn try_switch(
        &self,
        session: &UserSession,
        user_email: &str,
        organization_id: &str,
    ) -> Result<String, PortalError> {
        let current_token = self
            .identity
            .get_access_token_silently(session, GetTokenOptions::default())
            .await?;

        match self
            .gateway
            .prepare_switch(&current_token, organization_id, user_email)
            .await
        {
            Ok(()) => tracing::info!("Prepare-switch accepted"),
            Err(e) if self.require_switch_approval => return Err(e),
            Err(e) => tracing::warn!(error = %e, "Prepare-switch failed; requesting token anyway"),
        }

        let new_token = self
            .identity
            .get_access_token_silently(
                session,
                GetTokenOptions {
                    organization_id: Some(organization_id),
                    cache_mode: CacheMode::Off,
                },
            )
            .await?;

        let active_org = decode_jwt_claims(&new_token)
            .ok()
            .and_then(|claims| active_organization(&claims));
        if let Some(active_org) = active_org {
            return Ok(active_org);
        }

        session
            .tokens()
            .await?
            .as_ref()
            .and_then(active_org_from_tokens)
            .ok_or_else(|| PortalError::Decode("new token carries no organisation claim".to_string()))
    }
}
