//! Domain errors for the lead generation orchestrator.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single call to the remote generation endpoint.
///
/// One value describes exactly one attempt. Recovery is decided by the
/// [`ClassificationPolicy`](crate::services::ClassificationPolicy), never by
/// the client that produced the error.
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    /// Malformed request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or expired credentials (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Access to the requested resource is restricted (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Nothing matched the criteria, or the resource is gone (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream throttling (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimited,

    /// Upstream is unavailable as a whole (HTTP 503)
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Any other 5xx response
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Connection-level failure before a response was received
    #[error("Network error: {0}")]
    Network(String),

    /// The per-call timeout elapsed
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered `success: false`
    #[error("Generation rejected: {0}")]
    Rejected(String),

    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The token provider had no bearer token to attach
    #[error("No authentication token available")]
    MissingToken,

    /// The call was torn down because the session was cancelled
    #[error("Call cancelled")]
    Cancelled,

    /// Unexpected status code
    #[error("Unknown error ({0}): {1}")]
    Unknown(StatusCode, String),
}

impl GenerationError {
    /// Map a non-success HTTP status and its body to an error variant.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => Self::InvalidRequest(body),
            401 => Self::Unauthorized(body),
            403 => Self::Forbidden(body),
            404 => Self::NotFound(body),
            429 => Self::RateLimited,
            503 => Self::Unavailable(body),
            500..=599 => Self::ServerError(status, body),
            _ => Self::Unknown(status, body),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Invalid caller-supplied generation criteria.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    /// Target outside 1..=999
    #[error("Invalid target: {0}. Must be between 1 and 999")]
    InvalidTarget(u32),

    /// Criteria were not a JSON object
    #[error("Criteria must be a JSON object, got {0}")]
    NotAnObject(String),
}

/// Failure to collect the result of a spawned session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session task panicked or was aborted before producing a report
    #[error("Session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
