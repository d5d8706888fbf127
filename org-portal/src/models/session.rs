use crate::error::PortalError;
use crate::models::organization::SwitchReport;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const TOKENS_KEY: &str = "tokens";
const EMAIL_KEY: &str = "email";
const ACTIVE_ORG_KEY: &str = "active_org";
const LAST_SWITCH_KEY: &str = "last_switch";
const OAUTH_STATE_KEY: &str = "oauth_state";

/// Seconds before expiry at which a cached token is no longer handed out.
const EXPIRY_LEEWAY_SECS: i64 = 30;

/// Token endpoint answer, shared by every grant type.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Tokens held server-side for one browser session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    /// Unix seconds.
    pub expires_at: Option<i64>,
}

impl SessionTokens {
    /// Keeps `previous_refresh` when the provider did not rotate it.
    pub fn from_response(response: TokenResponse, now: i64, previous_refresh: Option<String>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            id_token: response.id_token,
            expires_at: response.expires_in.map(|secs| now.saturating_add(secs)),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at.saturating_sub(EXPIRY_LEEWAY_SECS) <= now)
    }
}

/// Typed accessors over the `tower-sessions` session.
#[derive(Clone)]
pub struct UserSession {
    session: Session,
}

impl UserSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn tokens(&self) -> Result<Option<SessionTokens>, PortalError> {
        Ok(self.session.get(TOKENS_KEY).await?)
    }

    pub async fn set_tokens(&self, tokens: &SessionTokens) -> Result<(), PortalError> {
        Ok(self.session.insert(TOKENS_KEY, tokens).await?)
    }

    pub async fn email(&self) -> Result<Option<String>, PortalError> {
        Ok(self.session.get(EMAIL_KEY).await?)
    }

    pub async fn set_email(&self, email: &str) -> Result<(), PortalError> {
        Ok(self.session.insert(EMAIL_KEY, email).await?)
    }

    pub async fn active_org(&self) -> Result<Option<String>, PortalError> {
        Ok(self.session.get(ACTIVE_ORG_KEY).await?)
    }

    pub async fn set_active_org(&self, active_org: Option<&str>) -> Result<(), PortalError> {
        match active_org {
            Some(org) => self.session.insert(ACTIVE_ORG_KEY, org).await?,
            None => {
                self.session.remove::<String>(ACTIVE_ORG_KEY).await?;
            }
        }
        Ok(())
    }

    pub async fn last_switch(&self) -> Result<Option<SwitchReport>, PortalError> {
        Ok(self.session.get(LAST_SWITCH_KEY).await?)
    }

    pub async fn set_last_switch(&self, report: &SwitchReport) -> Result<(), PortalError> {
        Ok(self.session.insert(LAST_SWITCH_KEY, report).await?)
    }

    pub async fn set_oauth_state(&self, state: &str) -> Result<(), PortalError> {
        Ok(self.session.insert(OAUTH_STATE_KEY, state).await?)
    }

    /// One-shot: the stored state is removed whether or not it matches.
    pub async fn take_oauth_state(&self) -> Result<Option<String>, PortalError> {
        Ok(self.session.remove(OAUTH_STATE_KEY).await?)
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(self.tokens().await, Ok(Some(_)))
    }

    pub async fn clear(&self) {
        self.session.clear().await;
    }
}

/// Logged-in user, attached by `auth_middleware`.
#[derive(Clone)]
pub struct AuthUser {
    pub email: String,
    pub session: UserSession,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| Redirect::to("/login").into_response())
    }
}
