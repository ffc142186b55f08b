//! Leadgen - bounded incremental lead generation
//!
//! Repeatedly calls a remote, non-deterministic "generate a batch of leads"
//! service until a target number of *unique* records has been collected,
//! within an attempt cap and an optional wall-clock budget, with cooperative
//! cancellation and per-category handling of remote failures.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): identity extraction, deduplication,
//!   error classification, request building, progress reporters
//! - **Application Layer** (`application`): the generation loop and
//!   ready-made orchestrators for the two search use-cases
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, token
//!   providers, configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use leadgen::application::organization_orchestrator;
//! use leadgen::domain::models::{Config, GenerationCriteria};
//! use leadgen::infrastructure::EnvTokenProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let tokens = Arc::new(EnvTokenProvider::new("LEADGEN_API_TOKEN"));
//!     let orchestrator = organization_orchestrator(&config, tokens)?;
//!
//!     let criteria = GenerationCriteria::from_json(serde_json::json!({"industry": "retail"}), 50)?;
//!     let handle = orchestrator.start(criteria);
//!     let report = handle.wait().await?;
//!     println!("{}: {} records", report.outcome.kind(), report.outcome.items().len());
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{GenerationOrchestrator, SessionHandle, SessionLimits};
pub use domain::errors::{CriteriaError, GenerationError, SessionError};
pub use domain::models::{
    Batch, Config, GenerationCriteria, IdentityKey, Outcome, OutcomeKind, ProgressSnapshot,
    SessionReport,
};
pub use domain::ports::{
    GenerationClient, GenerationRequest, IdentityExtractor, ProgressReporter, RequestBuilder,
    TokenProvider,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ClassificationPolicy, ErrorCategory, RecoveryAction};
