//! Port trait definitions (Hexagonal Architecture)
//!
//! Interfaces the orchestrator depends on and adapters implement:
//! - GenerationClient: one call to the remote generation endpoint
//! - RequestBuilder: criteria + rotation index into a request body
//! - IdentityExtractor: record into deduplication key
//! - TokenProvider: bearer token for each call
//! - ProgressReporter: interim session state

pub mod generation_client;
pub mod identity;
pub mod progress;
pub mod token_provider;

pub use generation_client::{GenerationClient, GenerationRequest, RequestBuilder};
pub use identity::IdentityExtractor;
pub use progress::ProgressReporter;
pub use token_provider::TokenProvider;
