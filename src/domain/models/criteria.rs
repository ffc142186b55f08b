//! Caller-supplied session criteria

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::CriteriaError;

/// Smallest target a session accepts
pub const MIN_TARGET: u32 = 1;

/// Largest target a session accepts
pub const MAX_TARGET: u32 = 999;

/// Caller-supplied search parameters plus the number of unique records wanted.
///
/// The parameters are opaque to the orchestrator; they are forwarded to the
/// remote endpoint as-is by the request builder. Criteria are validated once
/// on construction and never change for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationCriteria {
    params: Map<String, Value>,
    target: u32,
}

impl GenerationCriteria {
    /// Build criteria from a parameter map and a target count.
    pub fn new(params: Map<String, Value>, target: u32) -> Result<Self, CriteriaError> {
        if !(MIN_TARGET..=MAX_TARGET).contains(&target) {
            return Err(CriteriaError::InvalidTarget(target));
        }
        Ok(Self { params, target })
    }

    /// Build criteria from an arbitrary JSON value, which must be an object.
    pub fn from_json(value: Value, target: u32) -> Result<Self, CriteriaError> {
        match value {
            Value::Object(params) => Self::new(params, target),
            Value::Null => Self::new(Map::new(), target),
            other => Err(CriteriaError::NotAnObject(json_type_name(&other).to_string())),
        }
    }

    /// Search parameters forwarded to the endpoint
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Number of unique records the caller wants
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Target as a collection length
    pub fn target_len(&self) -> usize {
        self.target as usize
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_bounds() {
        assert!(GenerationCriteria::new(Map::new(), 1).is_ok());
        assert!(GenerationCriteria::new(Map::new(), 999).is_ok());
        assert_eq!(
            GenerationCriteria::new(Map::new(), 0).unwrap_err(),
            CriteriaError::InvalidTarget(0)
        );
        assert_eq!(
            GenerationCriteria::new(Map::new(), 1000).unwrap_err(),
            CriteriaError::InvalidTarget(1000)
        );
    }

    #[test]
    fn test_from_json_object() {
        let criteria =
            GenerationCriteria::from_json(json!({"industry": "retail", "city": "Lisbon"}), 25)
                .unwrap();
        assert_eq!(criteria.target(), 25);
        assert_eq!(criteria.params()["industry"], "retail");
    }

    #[test]
    fn test_from_json_null_is_empty() {
        let criteria = GenerationCriteria::from_json(Value::Null, 5).unwrap();
        assert!(criteria.params().is_empty());
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        let err = GenerationCriteria::from_json(json!(["a", "b"]), 5).unwrap_err();
        assert_eq!(err, CriteriaError::NotAnObject("array".into()));
    }
}
