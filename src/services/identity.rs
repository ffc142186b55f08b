//! Identity extractors for JSON lead records.

use serde_json::Value;

use crate::domain::models::{EndpointConfig, IdentityKey};
use crate::domain::ports::IdentityExtractor;

impl<R, F> IdentityExtractor<R> for F
where
    F: Fn(&R) -> IdentityKey + Send + Sync,
{
    fn key(&self, record: &R) -> IdentityKey {
        self(record)
    }
}

/// Organization records: registry identifier first, organization name second.
///
/// Two organizations are the same when both expose a registry identifier and
/// the identifiers match, otherwise when their names match case-insensitively.
#[derive(Debug, Clone)]
pub struct OrganizationIdentity {
    registry_fields: Vec<String>,
    name_fields: Vec<String>,
}

impl OrganizationIdentity {
    /// Extractor reading the first present field of each list
    pub fn new(registry_fields: Vec<String>, name_fields: Vec<String>) -> Self {
        Self {
            registry_fields,
            name_fields,
        }
    }

    /// Extractor using the field names configured for `endpoint`
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Self {
        Self::new(
            endpoint.registry_fields.clone(),
            endpoint.label_fields.clone(),
        )
    }
}

impl Default for OrganizationIdentity {
    fn default() -> Self {
        Self::from_endpoint(&EndpointConfig::organization())
    }
}

impl IdentityExtractor<Value> for OrganizationIdentity {
    fn key(&self, record: &Value) -> IdentityKey {
        let label = first_field(record, &self.name_fields)
            .map(|raw| normalize_name(&raw))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| canonical_label(record));

        match first_field(record, &self.registry_fields)
            .map(|raw| normalize_registry_id(&raw))
            .filter(|id| !id.is_empty())
        {
            Some(id) => IdentityKey::with_registry(label, id),
            None => IdentityKey::label(label),
        }
    }
}

/// Social profile records: case-insensitive handle.
#[derive(Debug, Clone)]
pub struct ProfileIdentity {
    handle_fields: Vec<String>,
}

impl ProfileIdentity {
    /// Extractor reading the first present handle field
    pub fn new(handle_fields: Vec<String>) -> Self {
        Self { handle_fields }
    }

    /// Extractor using the field names configured for `endpoint`
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Self {
        Self::new(endpoint.label_fields.clone())
    }
}

impl Default for ProfileIdentity {
    fn default() -> Self {
        Self::from_endpoint(&EndpointConfig::profile())
    }
}

impl IdentityExtractor<Value> for ProfileIdentity {
    fn key(&self, record: &Value) -> IdentityKey {
        let label = first_field(record, &self.handle_fields)
            .map(|raw| normalize_handle(&raw))
            .filter(|handle| !handle.is_empty())
            .unwrap_or_else(|| canonical_label(record));
        IdentityKey::label(label)
    }
}

/// First non-null scalar among `fields`, rendered as a string
fn first_field(record: &Value, fields: &[String]) -> Option<String> {
    fields.iter().find_map(|field| match record.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Registry ids are compared on their alphanumeric characters only, so
/// "12.345.678/0001-99" and "12345678000199" are the same id.
fn normalize_registry_id(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn normalize_handle(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_lowercase()
}

/// Deterministic fallback for records without any identifying field.
/// `serde_json` maps are sorted, so equal payloads render identically.
fn canonical_label(record: &Value) -> String {
    format!("#{record}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_organization_prefers_registry_id() {
        let identity = OrganizationIdentity::default();
        let key = identity.key(&json!({
            "company_name": "  Acme   Trading LTD ",
            "registry_id": "12.345.678/0001-99"
        }));
        assert_eq!(key.registry_id(), Some("12345678000199"));
        assert_eq!(key.label_str(), "acme trading ltd");
    }

    #[test]
    fn test_organization_falls_back_to_name() {
        let identity = OrganizationIdentity::default();
        let a = identity.key(&json!({"company_name": "Globex"}));
        let b = identity.key(&json!({"name": "GLOBEX", "registry_id": "998877"}));
        assert!(a.registry_id().is_none());
        assert!(a.matches(&b));
    }

    #[test]
    fn test_organization_numeric_registry_id() {
        let identity = OrganizationIdentity::default();
        let key = identity.key(&json!({"name": "Initech", "tax_id": 445566}));
        assert_eq!(key.registry_id(), Some("445566"));
    }

    #[test]
    fn test_organization_blank_registry_is_ignored() {
        let identity = OrganizationIdentity::default();
        let key = identity.key(&json!({"name": "Initech", "registry_id": " - "}));
        assert!(key.registry_id().is_none());
    }

    #[test]
    fn test_profile_handle_is_case_insensitive() {
        let identity = ProfileIdentity::default();
        let a = identity.key(&json!({"username": "@JaneDoe"}));
        let b = identity.key(&json!({"handle": "janedoe"}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_fields_fall_back_to_payload() {
        let identity = ProfileIdentity::default();
        let a = identity.key(&json!({"bio": "x", "followers": 10}));
        let b = identity.key(&json!({"followers": 10, "bio": "x"}));
        let c = identity.key(&json!({"bio": "y"}));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_closure_extractor() {
        let extractor = |n: &u32| IdentityKey::label(n.to_string());
        assert_eq!(extractor.key(&7), IdentityKey::label("7"));
    }
}
