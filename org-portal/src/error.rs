use crate::models::query::INVALID_QUERY_MESSAGE;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Login required")]
    LoginRequired,

    #[error("Invalid login state")]
    InvalidState,

    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    #[error("{0}")]
    Backend(String),

    #[error("Failed to decode token: {0}")]
    Decode(String),

    #[error("{}", INVALID_QUERY_MESSAGE)]
    InvalidQuery,

    #[error("API gateway is not configured")]
    GatewayNotConfigured,

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl From<PortalError> for AppError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::LoginRequired => AppError::Unauthorized(anyhow::anyhow!("Login required")),
            PortalError::InvalidState => AppError::BadRequest(anyhow::anyhow!("Invalid login state")),
            PortalError::IdentityProvider(e) => AppError::BadGateway(e),
            PortalError::Backend(e) => AppError::BadGateway(e),
            PortalError::Decode(e) => AppError::BadGateway(format!("Failed to decode token: {}", e)),
            PortalError::InvalidQuery => AppError::Unprocessable(INVALID_QUERY_MESSAGE.to_string()),
            PortalError::GatewayNotConfigured => AppError::ServiceUnavailable,
            PortalError::Session(e) => AppError::InternalError(anyhow::Error::new(e)),
        }
    }
}
