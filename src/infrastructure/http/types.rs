//! Wire types for the generation endpoints

use serde::{Deserialize, Serialize};

/// Response body shared by every generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse<R> {
    /// `false` when the service declined to generate
    pub success: bool,

    /// Generated records; absent means none
    #[serde(default = "Vec::new")]
    pub contacts: Vec<R>,

    /// Explanation sent with `success: false`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_missing_contacts_defaults_to_empty() {
        let response: GenerationResponse<Value> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert!(response.success);
        assert!(response.contacts.is_empty());
        assert!(response.message.is_none());
    }

    #[test]
    fn test_rejection_with_message() {
        let response: GenerationResponse<Value> = serde_json::from_value(json!({
            "success": false,
            "message": "daily quota reached"
        }))
        .unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("daily quota reached"));
    }
}
