//! Infrastructure layer: adapters for the outside world

pub mod config;
pub mod credentials;
pub mod http;
pub mod logging;
pub mod scripted;

pub use config::{ConfigError, ConfigLoader};
pub use credentials::{EnvTokenProvider, StaticTokenProvider};
pub use http::{HttpClientConfig, HttpGenerationClient};
pub use logging::{LogConfig, LoggerImpl};
pub use scripted::{ScriptedGenerationClient, ScriptedReply};
