use crate::error::PortalError;
use serde_json::Value;

pub const INVALID_QUERY_MESSAGE: &str = "Query must be JSON WITH \"query\" property.";

/// A GraphQL-style request body for the gateway's `/public` endpoint.
/// The raw text is kept so it is forwarded byte for byte.
#[derive(Debug, Clone)]
pub struct ApiQuery {
    raw: String,
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl ApiQuery {
    pub fn parse(text: &str) -> Result<Self, PortalError> {
        let json: Value = serde_json::from_str(text).map_err(|e| {
            tracing::debug!(error = %e, "Rejected query payload");
            PortalError::InvalidQuery
        })?;

        match json.get("query") {
            Some(query) if is_truthy(query) => Ok(Self {
                raw: text.to_string(),
            }),
            _ => Err(PortalError::InvalidQuery),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_body(self) -> String {
        self.raw
    }
}
