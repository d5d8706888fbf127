use crate::error::PortalError;
use crate::models::{SessionTokens, UserSession};
use crate::services::active_org_from_tokens;
use crate::utils::{jwt, now_unix, random_state};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use service_core::error::AppError;
use tower_sessions::Session;

#[derive(Deserialize)]
pub struct LoginParams {
    pub organization_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Redirects to the identity provider's universal login.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<LoginParams>,
) -> Result<Redirect, AppError> {
    let session = UserSession::new(session);
    let oauth_state = random_state();
    session.set_oauth_state(&oauth_state).await?;

    let url = state
        .identity
        .authorize_url(&oauth_state, params.organization_id.as_deref())?;

    tracing::info!("Redirecting to identity provider login");
    Ok(Redirect::to(url.as_str()))
}

fn email_from_tokens(tokens: &SessionTokens) -> Option<String> {
    tokens
        .id_token
        .iter()
        .chain(std::iter::once(&tokens.access_token))
        .filter_map(|token| jwt::decode_jwt_claims(token).ok())
        .find_map(|claims| jwt::email(&claims))
}

/// Processes the authorization-code callback.
pub async fn callback_handler(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, AppError> {
    let session = UserSession::new(session);
    let expected_state = session.take_oauth_state().await?;

    if let Some(error) = params.error {
        tracing::error!(
            error = %error,
            description = ?params.error_description,
            "Identity provider returned an error"
        );
        return Err(PortalError::IdentityProvider(error).into());
    }

    match (expected_state, params.state) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => {
            tracing::warn!("OAuth state mismatch on callback");
            return Err(PortalError::InvalidState.into());
        }
    }
    let code = params.code.ok_or(PortalError::InvalidState)?;

    let response = state.identity.exchange_code(&code).await?;
    let tokens = SessionTokens::from_response(response, now_unix(), None);

    let email = email_from_tokens(&tokens)
        .ok_or_else(|| PortalError::Decode("token carries no email claim".to_string()))?;
    let active_org = active_org_from_tokens(&tokens);

    session.set_tokens(&tokens).await?;
    session.set_email(&email).await?;
    session.set_active_org(active_org.as_deref()).await?;

    tracing::info!(email = %email, active_org = ?active_org, "User logged in successfully");

    Ok(Redirect::to("/"))
}

/// Clears the session and ends the identity provider session too.
pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    UserSession::new(session).clear().await;

    let url = state.identity.logout_url()?;
    Ok(Redirect::to(url.as_str()))
}
