//! Record identity and batches

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity derived from a generated record, used for deduplication.
///
/// `label` is always present (normalized organization name, lower-cased
/// handle, or a canonical rendering of the payload as a last resort).
/// `registry_id` carries an exact registry identifier when the record exposes
/// one. Two keys denote the same entity when both carry a registry id and the
/// ids are equal, or when at least one side lacks a registry id and the labels
/// are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    label: String,
    registry_id: Option<String>,
}

impl IdentityKey {
    /// Key identified by label only
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            registry_id: None,
        }
    }

    /// Key carrying both a registry identifier and a fallback label
    pub fn with_registry(label: impl Into<String>, registry_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            registry_id: Some(registry_id.into()),
        }
    }

    /// Normalized label
    pub fn label_str(&self) -> &str {
        &self.label
    }

    /// Normalized registry identifier, when known
    pub fn registry_id(&self) -> Option<&str> {
        self.registry_id.as_deref()
    }

    /// Whether `self` and `other` identify the same entity.
    pub fn matches(&self, other: &Self) -> bool {
        match (&self.registry_id, &other.registry_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.label == other.label,
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.registry_id {
            Some(id) => write!(f, "{id} ({})", self.label),
            None => f.write_str(&self.label),
        }
    }
}

/// Records returned by one successful remote call. May be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch<R> {
    /// Records in the order the service returned them
    pub items: Vec<R>,
}

impl<R> Batch<R> {
    /// Batch holding `items`
    pub fn new(items: Vec<R>) -> Self {
        Self { items }
    }

    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch has no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ids_take_precedence() {
        let a = IdentityKey::with_registry("acme ltd", "12345678000199");
        let b = IdentityKey::with_registry("acme ltd", "99999999000100");
        let c = IdentityKey::with_registry("acme limited", "12345678000199");

        assert!(!a.matches(&b), "same name, different registry ids");
        assert!(a.matches(&c), "same registry id, different names");
    }

    #[test]
    fn test_label_fallback_when_either_side_lacks_registry() {
        let with_id = IdentityKey::with_registry("acme ltd", "12345678000199");
        let without_id = IdentityKey::label("acme ltd");
        let other = IdentityKey::label("globex");

        assert!(with_id.matches(&without_id));
        assert!(without_id.matches(&with_id));
        assert!(!without_id.matches(&other));
    }

    #[test]
    fn test_display() {
        assert_eq!(IdentityKey::label("jane").to_string(), "jane");
        assert_eq!(
            IdentityKey::with_registry("acme", "123").to_string(),
            "123 (acme)"
        );
    }
}
