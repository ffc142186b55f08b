//! JSON request bodies

use serde_json::Value;

use crate::domain::models::{EndpointConfig, GenerationCriteria};
use crate::domain::ports::{GenerationRequest, RequestBuilder};

/// Posts the criteria parameters as-is, plus the rotation index and
/// (optionally) the target count under configurable field names.
#[derive(Debug, Clone)]
pub struct JsonRequestBuilder {
    attempt_field: String,
    target_field: Option<String>,
}

impl JsonRequestBuilder {
    /// Builder writing the rotation index to `attempt_field` and, when set, the target to `target_field`
    pub fn new(attempt_field: impl Into<String>, target_field: Option<String>) -> Self {
        Self {
            attempt_field: attempt_field.into(),
            target_field,
        }
    }

    /// Builder using the field names configured for `endpoint`
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Self {
        Self::new(endpoint.attempt_field.clone(), endpoint.target_field.clone())
    }
}

impl Default for JsonRequestBuilder {
    fn default() -> Self {
        Self::new("attempt", None)
    }
}

impl RequestBuilder for JsonRequestBuilder {
    fn build(&self, criteria: &GenerationCriteria, attempt_index: u32) -> GenerationRequest {
        let mut body = criteria.params().clone();
        if let Some(field) = &self.target_field {
            body.insert(field.clone(), Value::from(criteria.target()));
        }
        // Always last so criteria can never shadow the rotation index
        body.insert(self.attempt_field.clone(), Value::from(attempt_index));

        GenerationRequest {
            attempt_index,
            body,
        }
    }
}
