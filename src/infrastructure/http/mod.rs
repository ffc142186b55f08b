//! HTTP adapter for the remote generation endpoints

pub mod client;
pub mod types;

pub use client::{HttpClientConfig, HttpGenerationClient};
pub use types::GenerationResponse;
