//! Remote generation port

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::domain::errors::GenerationError;
use crate::domain::models::{Batch, GenerationCriteria};

/// One request to the generation endpoint, ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Zero-based rotation index; the remote service uses it to vary results
    pub attempt_index: u32,

    /// JSON body posted to the endpoint
    pub body: Map<String, Value>,
}

/// Builds the request for a given attempt from the session criteria.
pub trait RequestBuilder: Send + Sync {
    /// Request for attempt `attempt_index` (zero-based)
    fn build(&self, criteria: &GenerationCriteria, attempt_index: u32) -> GenerationRequest;
}

/// Port for the remote "generate a batch of leads" service.
///
/// # Contract
///
/// - Exactly one remote call per invocation. Implementations must not retry;
///   every retry decision belongs to the orchestrator.
/// - Each call is bounded by the implementation's own per-call timeout.
/// - `cancel` is the session's cancellation token. Implementations should stop
///   waiting on the remote side as soon as it fires and return
///   [`GenerationError::Cancelled`].
#[async_trait]
pub trait GenerationClient<R>: Send + Sync {
    /// Make one call and return its batch or the single failure
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Batch<R>, GenerationError>;
}
