//! Layered configuration loading and validation

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::{Config, EndpointConfig};
use crate::domain::models::GenerationConfig;

/// Upper bound for the per-session attempt cap
pub const MAX_ATTEMPTS_LIMIT: u32 = 30;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `api.base_url` is blank
    #[error("API base_url cannot be empty")]
    EmptyBaseUrl,

    /// `api.call_timeout_secs` is zero
    #[error("Invalid call_timeout_secs: {0}. Must be positive")]
    InvalidCallTimeout(u64),

    /// `generation.max_attempts` outside 1..=30
    #[error("Invalid max_attempts: {0}. Must be between 1 and 30")]
    InvalidMaxAttempts(u32),

    /// `generation.time_budget_secs` is zero
    #[error("Invalid time_budget_secs: {0}. Must be positive when set")]
    InvalidTimeBudget(u64),

    /// Unknown `logging.level`
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown `logging.format`
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown `logging.rotation`
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    /// An endpoint has a blank path
    #[error("Endpoint '{0}' path cannot be empty")]
    EmptyEndpointPath(&'static str),

    /// An endpoint lists no label fields
    #[error("Endpoint '{0}' needs at least one label field")]
    MissingLabelFields(&'static str),

    /// Any other invalid setting
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .leadgen/config.yaml (project config)
    /// 3. .leadgen/local.yaml (local overrides, optional)
    /// 4. Environment variables (LEADGEN_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".leadgen/config.yaml"))
            .merge(Yaml::file(".leadgen/local.yaml"))
            .merge(Env::prefixed("LEADGEN_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.api.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if config.api.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidCallTimeout(0));
        }
        if config.api.token_env.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api.token_env cannot be empty".to_string(),
            ));
        }

        Self::validate_generation(&config.generation)?;
        Self::validate_endpoint("organization", &config.organization)?;
        Self::validate_endpoint("profile", &config.profile)?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }

    fn validate_generation(generation: &GenerationConfig) -> Result<(), ConfigError> {
        if generation.max_attempts == 0 || generation.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ConfigError::InvalidMaxAttempts(generation.max_attempts));
        }
        if generation.time_budget_secs == Some(0) {
            return Err(ConfigError::InvalidTimeBudget(0));
        }
        Ok(())
    }

    fn validate_endpoint(name: &'static str, endpoint: &EndpointConfig) -> Result<(), ConfigError> {
        if endpoint.path.trim().is_empty() {
            return Err(ConfigError::EmptyEndpointPath(name));
        }
        if endpoint.label_fields.is_empty() {
            return Err(ConfigError::MissingLabelFields(name));
        }
        if endpoint.attempt_field.is_empty() {
            return Err(ConfigError::ValidationFailed(format!(
                "Endpoint '{name}' attempt_field cannot be empty"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PolicyName;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation.max_attempts, 30);
        assert_eq!(config.generation.time_budget_secs, None);
        assert_eq!(config.api.call_timeout_secs, 25);
        assert_eq!(config.organization.policy, PolicyName::BulkOrganization);
        assert_eq!(config.profile.policy, PolicyName::ProfileSearch);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
api:
  base_url: https://leads.example.com
  call_timeout_secs: 10
generation:
  max_attempts: 12
  time_budget_secs: 90
profile:
  path: /v2/profiles
  policy: profile_search
  label_fields: [handle]
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.api.base_url, "https://leads.example.com");
        assert_eq!(config.api.token_env, "LEADGEN_API_TOKEN");
        assert_eq!(config.generation.max_attempts, 12);
        assert_eq!(config.generation.time_budget_secs, Some(90));
        assert_eq!(config.profile.path, "/v2/profiles");
        assert_eq!(config.profile.attempt_field, "attempt");
        assert_eq!(config.organization.path, "/api/leads/generate");
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let yaml = r"
organization:
  path: /x
  policy: aggressive
  label_fields: [name]
";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_validate_max_attempts_bounds() {
        let mut config = Config::default();
        config.generation.max_attempts = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxAttempts(0))
        ));

        config.generation.max_attempts = 31;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxAttempts(31))
        ));

        config.generation.max_attempts = 1;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_time_budget() {
        let mut config = Config::default();
        config.generation.time_budget_secs = Some(0);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTimeBudget(0))
        ));
    }

    #[test]
    fn test_validate_api_settings() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyBaseUrl)
        ));

        let mut config = Config::default();
        config.api.call_timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidCallTimeout(0))
        ));
    }

    #[test]
    fn test_validate_endpoints() {
        let mut config = Config::default();
        config.profile.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyEndpointPath("profile"))
        ));

        let mut config = Config::default();
        config.organization.label_fields.clear();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingLabelFields("organization"))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "generation:\n  max_attempts: 5\napi:\n  base_url: http://127.0.0.1:9000"
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.generation.max_attempts, 5);
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.profile.path, "/api/social-profiles/generate");
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "generation:\n  max_attempts: 50").unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidMaxAttempts(50))
        ));
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("LEADGEN_GENERATION__MAX_ATTEMPTS", Some("7")),
                ("LEADGEN_API__BASE_URL", Some("http://override:1")),
                ("LEADGEN_API_TOKEN", Some("secret")),
            ],
            || {
                let config: Config = ConfigLoader::figment().extract().unwrap();
                assert_eq!(config.generation.max_attempts, 7);
                assert_eq!(config.api.base_url, "http://override:1");
            },
        );
    }
}
