use crate::error::PortalError;
use base64::{engine::general_purpose, Engine as _};
use serde_json::{Map, Value};

/// Claims that may name the active organization, most specific first.
/// `organisation` is what the claims hook writes.
const ORGANIZATION_CLAIMS: [&str; 5] = [
    "organisation",
    "organization",
    "org_name",
    "organization_id",
    "org_id",
];

/// Decode JWT claims without validation
///
/// Only used on tokens this portal just received from the identity provider
/// over TLS, to read display data. This is NOT an authorization check: the
/// gateway validates every token it receives.
pub fn decode_jwt_claims(token: &str) -> Result<Map<String, Value>, PortalError> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(PortalError::Decode("Invalid JWT format".to_string()));
    }

    // Tolerate padded payloads.
    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| PortalError::Decode(format!("Failed to decode JWT payload: {}", e)))?;

    serde_json::from_slice(&payload)
        .map_err(|e| PortalError::Decode(format!("Failed to parse JWT claims: {}", e)))
}

/// Display name of the organization a token is scoped to.
pub fn active_organization(claims: &Map<String, Value>) -> Option<String> {
    ORGANIZATION_CLAIMS
        .iter()
        .filter_map(|key| claims.get(*key))
        .find_map(|value| match value {
            Value::String(name) if !name.is_empty() => Some(name.clone()),
            Value::Object(org) => org
                .get("name")
                .or_else(|| org.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
}

pub fn email(claims: &Map<String, Value>) -> Option<String> {
    claims
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
pub(crate) fn encode_unsigned(claims: &Value) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}
