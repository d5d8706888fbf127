//! Custom claims written onto the outgoing tokens.
//!
//! The access token is read by the API middleware; the id token by the
//! frontend, so every authorization claim goes onto both under one key.

use crate::models::AccountContext;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Canonical claim keys.
pub mod keys {
    pub const METRY_USER: &str = "metry_user";
    pub const METRY: &str = "metry";
    pub const ACCOUNT_ID: &str = "account_id";
    pub const ORGANISATION: &str = "organisation";
    pub const ACCOUNT_ROLES: &str = "account_roles";
    pub const IS_SYSTEM_LEVEL: &str = "isSystemLevel";
}

/// Constant marker put on every enriched id token; consumers use it as a
/// liveness signal for the hook.
pub const METRY_MARKER: &str = "ABCDXYZ";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TokenClaims(BTreeMap<String, Value>);

impl TokenClaims {
    pub fn set_custom_claim(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Claims for both tokens of one login.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClaimSet {
    pub access_token: TokenClaims,
    pub id_token: TokenClaims,
}

impl ClaimSet {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty() && self.id_token.is_empty()
    }

    fn set_on_both(&mut self, key: &str, value: Value) {
        self.access_token.set_custom_claim(key, value.clone());
        self.id_token.set_custom_claim(key, value);
    }

    /// Claims for a successful account lookup. Markers are always set;
    /// the rest only when the backend returned a meaningful value.
    pub fn from_account_context(context: &AccountContext) -> Self {
        let mut claims = ClaimSet::default();

        claims.id_token.set_custom_claim(keys::METRY_USER, true);
        claims.id_token.set_custom_claim(keys::METRY, METRY_MARKER);

        let mirrored = [
            (keys::ACCOUNT_ID, context.account_id()),
            (keys::ORGANISATION, context.organisation()),
            (keys::ACCOUNT_ROLES, context.roles()),
            (keys::IS_SYSTEM_LEVEL, context.is_system_level()),
        ];
        for (key, value) in mirrored {
            if let Some(value) = value {
                claims.set_on_both(key, value.clone());
            }
        }

        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: Value) -> AccountContext {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn markers_are_always_on_id_token() {
        let claims = ClaimSet::from_account_context(&context(json!({})));

        assert_eq!(claims.id_token.get(keys::METRY_USER), Some(&json!(true)));
        assert_eq!(claims.id_token.get(keys::METRY), Some(&json!("ABCDXYZ")));
        assert!(claims.access_token.is_empty());
    }

    #[test]
    fn empty_roles_are_not_written() {
        let claims = ClaimSet::from_account_context(&context(json!({ "roles": [] })));
        assert!(!claims.access_token.contains(keys::ACCOUNT_ROLES));
        assert!(!claims.id_token.contains(keys::ACCOUNT_ROLES));
    }

    #[test]
    fn roles_are_mirrored_on_both_tokens() {
        let claims = ClaimSet::from_account_context(&context(json!({ "roles": ["admin"] })));
        assert_eq!(claims.access_token.get(keys::ACCOUNT_ROLES), Some(&json!(["admin"])));
        assert_eq!(
            claims.access_token.get(keys::ACCOUNT_ROLES),
            claims.id_token.get(keys::ACCOUNT_ROLES)
        );
    }

    #[test]
    fn organisation_uses_one_spelling_on_both_tokens() {
        let claims = ClaimSet::from_account_context(&context(json!({
            "accountId": "acc_1",
            "organisation": { "id": "org_1", "name": "Acme" },
            "isSystemLevel": true
        })));

        let org = json!({ "id": "org_1", "name": "Acme" });
        assert_eq!(claims.access_token.get(keys::ORGANISATION), Some(&org));
        assert_eq!(claims.id_token.get(keys::ORGANISATION), Some(&org));
        assert_eq!(claims.id_token.get(keys::ACCOUNT_ID), Some(&json!("acc_1")));
        assert_eq!(claims.access_token.get(keys::IS_SYSTEM_LEVEL), Some(&json!(true)));
        // markers + four mirrored claims
        assert_eq!(claims.id_token.len(), 6);
        assert_eq!(claims.access_token.len(), 4);
    }

    #[test]
    fn false_system_level_is_not_written() {
        let claims = ClaimSet::from_account_context(&context(json!({ "isSystemLevel": false })));
        assert!(!claims.access_token.contains(keys::IS_SYSTEM_LEVEL));
    }

    #[test]
    fn mistyped_organisation_keeps_other_claims() {
        let claims = ClaimSet::from_account_context(&context(json!({
            "accountId": "acc_1",
            "organisation": { "id": 42, "name": "Acme" },
            "roles": ["admin"],
            "isSystemLevel": true
        })));

        let org = json!({ "id": 42, "name": "Acme" });
        assert_eq!(claims.access_token.get(keys::ORGANISATION), Some(&org));
        assert_eq!(claims.id_token.get(keys::ACCOUNT_ID), Some(&json!("acc_1")));
        assert_eq!(claims.id_token.get(keys::ACCOUNT_ROLES), Some(&json!(["admin"])));
        assert_eq!(claims.id_token.get(keys::METRY), Some(&json!("ABCDXYZ")));
    }

    #[test]
    fn empty_organisation_is_skipped_but_markers_stay() {
        let claims = ClaimSet::from_account_context(&context(json!({
            "accountId": "acc_1",
            "organisation": ""
        })));

        assert!(!claims.access_token.contains(keys::ORGANISATION));
        assert!(!claims.id_token.contains(keys::ORGANISATION));
        assert_eq!(claims.access_token.get(keys::ACCOUNT_ID), Some(&json!("acc_1")));
        assert_eq!(claims.id_token.get(keys::METRY_USER), Some(&json!(true)));
    }

    #[test]
    fn serializes_as_two_flat_maps() {
        let claims = ClaimSet::from_account_context(&context(json!({ "accountId": "acc_1" })));
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["access_token"], json!({ "account_id": "acc_1" }));
        assert_eq!(value["id_token"]["metry"], json!("ABCDXYZ"));
    }
}
