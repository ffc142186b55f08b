//! Service layer: the pluggable pieces the orchestrator is parameterized by.

pub mod accumulator;
pub mod error_classifier;
pub mod identity;
pub mod progress;
pub mod request_builder;

pub use accumulator::AccumulatedSet;
pub use error_classifier::{Classification, ClassificationPolicy, ErrorCategory, RecoveryAction};
pub use identity::{OrganizationIdentity, ProfileIdentity};
pub use progress::{
    ChannelProgressReporter, FanoutProgressReporter, NoopProgressReporter,
    TracingProgressReporter, WatchProgressReporter,
};
pub use request_builder::JsonRequestBuilder;
