//! Configuration model

use serde::{Deserialize, Serialize};

/// Main configuration structure for leadgen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Remote API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Session limits shared by every use-case
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Bulk organization search endpoint
    #[serde(default = "EndpointConfig::organization")]
    pub organization: EndpointConfig,

    /// Social profile search endpoint
    #[serde(default = "EndpointConfig::profile")]
    pub profile: EndpointConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            generation: GenerationConfig::default(),
            organization: EndpointConfig::organization(),
            profile: EndpointConfig::profile(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Remote API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiConfig {
    /// Base URL of the lead generation API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for a single generation call, in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_call_timeout_secs() -> u64 {
    25
}

fn default_token_env() -> String {
    "LEADGEN_API_TOKEN".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            call_timeout_secs: default_call_timeout_secs(),
            token_env: default_token_env(),
        }
    }
}

/// Session limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Attempt cap per session (1-30)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Optional wall-clock budget per session, in seconds
    #[serde(default)]
    pub time_budget_secs: Option<u64>,
}

const fn default_max_attempts() -> u32 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            time_budget_secs: None,
        }
    }
}

/// Named error classification policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyName {
    /// Rate limits and outages abort the whole search
    BulkOrganization,
    /// Rate limits are waited out; auth and visibility errors abort
    ProfileSearch,
}

/// One generation endpoint and how its records are identified
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointConfig {
    /// Path appended to the API base URL
    pub path: String,

    /// Error classification policy applied to this endpoint
    pub policy: PolicyName,

    /// Record fields holding an exact registry identifier, in priority order
    #[serde(default)]
    pub registry_fields: Vec<String>,

    /// Record fields holding the display name or handle, in priority order
    pub label_fields: Vec<String>,

    /// Request field carrying the rotation index
    #[serde(default = "default_attempt_field")]
    pub attempt_field: String,

    /// Request field carrying the target count, if the endpoint wants one
    #[serde(default)]
    pub target_field: Option<String>,
}

fn default_attempt_field() -> String {
    "attempt".to_string()
}

impl EndpointConfig {
    /// Defaults for the bulk organization search endpoint
    pub fn organization() -> Self {
        Self {
            path: "/api/leads/generate".to_string(),
            policy: PolicyName::BulkOrganization,
            registry_fields: vec!["registry_id".to_string(), "tax_id".to_string()],
            label_fields: vec!["company_name".to_string(), "name".to_string()],
            attempt_field: default_attempt_field(),
            target_field: Some("quantity".to_string()),
        }
    }

    /// Defaults for the social profile search endpoint
    pub fn profile() -> Self {
        Self {
            path: "/api/social-profiles/generate".to_string(),
            policy: PolicyName::ProfileSearch,
            registry_fields: vec![],
            label_fields: vec!["username".to_string(), "handle".to_string()],
            attempt_field: default_attempt_field(),
            target_field: Some("quantity".to_string()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file output: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
