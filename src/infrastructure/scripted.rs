//! Scripted generation client for tests and offline demos

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::GenerationError;
use crate::domain::models::Batch;
use crate::domain::ports::{GenerationClient, GenerationRequest};

/// One scripted reply, optionally delayed
#[derive(Debug, Clone)]
pub struct ScriptedReply<R> {
    /// Batch or failure returned by the call
    pub result: Result<Vec<R>, GenerationError>,
    /// Time the call takes before replying
    pub delay: Duration,
}

impl<R> ScriptedReply<R> {
    /// Immediate successful reply
    pub fn batch(items: Vec<R>) -> Self {
        Self {
            result: Ok(items),
            delay: Duration::ZERO,
        }
    }

    /// Immediate failed reply
    pub fn error(error: GenerationError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Delay this reply; cancellation still cuts it short
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replays a fixed sequence of replies, one per call.
///
/// Once the script runs out every call returns an empty batch. Every request
/// is recorded for later inspection.
pub struct ScriptedGenerationClient<R> {
    replies: Mutex<VecDeque<ScriptedReply<R>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl<R> ScriptedGenerationClient<R> {
    /// Client replaying `replies` in order
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply<R>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or(0)
    }
}

#[async_trait]
impl<R> GenerationClient<R> for ScriptedGenerationClient<R>
where
    R: Send + 'static,
{
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Batch<R>, GenerationError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| ScriptedReply::batch(Vec::new()));

        if !reply.delay.is_zero() {
            select! {
                () = tokio::time::sleep(reply.delay) => {}
                () = cancel.cancelled() => return Err(GenerationError::Cancelled),
            }
        }
        reply.result.map(Batch::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn request(attempt_index: u32) -> GenerationRequest {
        GenerationRequest {
            attempt_index,
            body: Map::new(),
        }
    }

    #[tokio::test]
    async fn test_replays_then_returns_empty() {
        let client = ScriptedGenerationClient::new([
            ScriptedReply::batch(vec![1, 2]),
            ScriptedReply::error(GenerationError::RateLimited),
        ]);
        let cancel = CancellationToken::new();

        assert_eq!(client.generate(request(0), &cancel).await.unwrap().items, vec![1, 2]);
        assert!(matches!(
            client.generate(request(1), &cancel).await,
            Err(GenerationError::RateLimited)
        ));
        assert!(client.generate(request(2), &cancel).await.unwrap().is_empty());

        let attempts: Vec<u32> = client.requests().iter().map(|r| r.attempt_index).collect();
        assert_eq!(attempts, vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_reply_observes_cancellation() {
        let client = ScriptedGenerationClient::new([
            ScriptedReply::batch(vec!["late"]).after(Duration::from_secs(20)),
        ]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let result = client.generate(request(0), &cancel).await;
        assert!(matches!(result, Err(GenerationError::Cancelled)));
    }
}
