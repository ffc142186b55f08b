//! Domain models

pub mod config;
pub mod criteria;
pub mod outcome;
pub mod progress;
pub mod record;

pub use config::{
    ApiConfig, Config, EndpointConfig, GenerationConfig, LoggingConfig, PolicyName,
};
pub use criteria::{GenerationCriteria, MAX_TARGET, MIN_TARGET};
pub use outcome::{Outcome, OutcomeKind, SessionReport, Termination};
pub use progress::ProgressSnapshot;
pub use record::{Batch, IdentityKey};
