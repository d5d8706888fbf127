use thiserror::Error;

/// Every way a post-login enrichment can abort. None of these reach the
/// identity provider: the hook degrades to "no claims added".
#[derive(Debug, Error)]
pub enum HookError {
    #[error("Secrets not properly configured: missing {}", .0.join(", "))]
    Configuration(Vec<&'static str>),

    #[error("Getting client_credentials failed: {0}")]
    UpstreamAuth(String),

    #[error("Backend hook failed: {0}")]
    Backend(String),

    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl HookError {
    /// Label used for the outcome counter.
    pub fn outcome(&self) -> &'static str {
        match self {
            HookError::Configuration(_) => "configuration_error",
            HookError::UpstreamAuth(_) => "upstream_auth_error",
            HookError::Backend(_) => "backend_error",
            HookError::Decode { .. } => "decode_error",
        }
    }
}
