use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body sent to the backend account-context endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountLookupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Backend answer describing who the user is within an organization.
///
/// Fields are kept as raw JSON: backends disagree on types (numeric ids,
/// `""` for "no organisation"), and one odd field must not cost the others.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountContext {
    #[serde(default)]
    pub account_id: Value,
    #[serde(default)]
    pub organisation: Value,
    #[serde(default)]
    pub roles: Value,
    #[serde(default)]
    pub is_system_level: Value,
}

/// `null`, `false`, `0` and `""` count as unset.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy(value: &Value) -> Option<&Value> {
    Some(value).filter(|value| is_truthy(value))
}

impl AccountContext {
    pub fn account_id(&self) -> Option<&Value> {
        truthy(&self.account_id)
    }

    pub fn organisation(&self) -> Option<&Value> {
        truthy(&self.organisation)
    }

    /// Only a non-empty role list is written.
    pub fn roles(&self) -> Option<&Value> {
        match &self.roles {
            Value::Array(roles) if !roles.is_empty() => Some(&self.roles),
            _ => None,
        }
    }

    pub fn is_system_level(&self) -> Option<&Value> {
        truthy(&self.is_system_level)
    }

    pub fn organisation_id(&self) -> Option<&Value> {
        self.organisation().and_then(|org| org.get("id"))
    }
}
