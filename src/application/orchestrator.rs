//! GenerationOrchestrator - bounded incremental generation loop
//!
//! Repeatedly calls a [`GenerationClient`] to accumulate a target number of
//! unique records:
//! - Attempt cap and optional wall-clock budget
//! - Cooperative cancellation, checked between attempts and during every sleep
//! - Per-category recovery (retry after a fixed delay, or abort)
//! - Progress snapshot after every attempt
//!
//! Calls are strictly serialized: a session never has more than one request
//! in flight.

use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::session::GenerationSession;
use crate::domain::errors::{GenerationError, SessionError};
use crate::domain::models::{GenerationCriteria, ProgressSnapshot, SessionReport, Termination};
use crate::domain::ports::{GenerationClient, IdentityExtractor, ProgressReporter, RequestBuilder};
use crate::services::{
    ClassificationPolicy, FanoutProgressReporter, NoopProgressReporter, RecoveryAction,
    WatchProgressReporter,
};

/// Attempt cap used by both search use-cases
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Hard limits of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Maximum number of calls per session
    pub max_attempts: u32,

    /// Wall-clock budget; always enforced when set
    pub time_budget: Option<Duration>,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            time_budget: None,
        }
    }
}

/// Drives generation sessions for one use-case.
///
/// Parameterized by the remote client, the identity extractor used for
/// deduplication, the request builder and the error classification policy.
/// Cheap to clone; every session gets fresh state.
pub struct GenerationOrchestrator<R> {
    client: Arc<dyn GenerationClient<R>>,
    identity: Arc<dyn IdentityExtractor<R>>,
    request_builder: Arc<dyn RequestBuilder>,
    policy: ClassificationPolicy,
    limits: SessionLimits,
}

impl<R> Clone for GenerationOrchestrator<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            identity: Arc::clone(&self.identity),
            request_builder: Arc::clone(&self.request_builder),
            policy: self.policy.clone(),
            limits: self.limits,
        }
    }
}

impl<R> GenerationOrchestrator<R>
where
    R: Send + 'static,
{
    /// Orchestrator with default limits (30 attempts, no time budget)
    pub fn new(
        client: Arc<dyn GenerationClient<R>>,
        identity: Arc<dyn IdentityExtractor<R>>,
        request_builder: Arc<dyn RequestBuilder>,
        policy: ClassificationPolicy,
    ) -> Self {
        Self {
            client,
            identity,
            request_builder,
            policy,
            limits: SessionLimits::default(),
        }
    }

    /// Replace the session limits
    #[must_use]
    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Limits applied to every session started by this orchestrator
    pub const fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// Recovery policy for failed attempts
    pub const fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    /// Spawn a session on the current tokio runtime.
    ///
    /// Progress is published on the handle's watch channel.
    pub fn start(&self, criteria: GenerationCriteria) -> SessionHandle<R> {
        self.start_with_reporter(criteria, Arc::new(NoopProgressReporter))
    }

    /// Spawn a session that also forwards every snapshot to `reporter`.
    pub fn start_with_reporter(
        &self,
        criteria: GenerationCriteria,
        reporter: Arc<dyn ProgressReporter>,
    ) -> SessionHandle<R> {
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let initial = ProgressSnapshot::initial(
            criteria.target(),
            self.limits.max_attempts,
            self.limits.time_budget.map(|budget| {
                u64::try_from(budget.as_millis()).unwrap_or(u64::MAX)
            }),
        );
        let watch = WatchProgressReporter::new(initial);
        let progress = watch.subscribe();
        let fanout = FanoutProgressReporter::new()
            .with(Arc::new(watch))
            .with(reporter);

        let orchestrator = self.clone();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            orchestrator
                .run_session(id, criteria, token, &fanout)
                .await
        });

        SessionHandle {
            id,
            cancel,
            progress,
            task,
        }
    }

    /// Run a session to completion on the calling task.
    pub async fn run(
        &self,
        criteria: GenerationCriteria,
        cancel: CancellationToken,
        reporter: &dyn ProgressReporter,
    ) -> SessionReport<R> {
        self.run_session(Uuid::new_v4(), criteria, cancel, reporter)
            .await
    }

    async fn run_session(
        &self,
        id: Uuid,
        criteria: GenerationCriteria,
        cancel: CancellationToken,
        reporter: &dyn ProgressReporter,
    ) -> SessionReport<R> {
        let span = info_span!(
            "generation_session",
            session_id = %id,
            policy = self.policy.name(),
            target_count = criteria.target()
        );

        async move {
            let mut session = GenerationSession::new(
                id,
                criteria,
                self.limits.max_attempts,
                self.limits.time_budget,
                cancel,
            );
            info!(
                max_attempts = self.limits.max_attempts,
                time_budget_secs = ?self.limits.time_budget.map(|b| b.as_secs()),
                "starting generation session"
            );

            let termination = self.drive(&mut session, reporter).await;
            let report = session.finish(termination);

            info!(
                outcome = %report.outcome.kind(),
                items = report.outcome.items().len(),
                attempts = report.attempts,
                elapsed_ms = report.elapsed_ms,
                "generation session finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// The attempt loop. Returns why the session stopped.
    async fn drive(
        &self,
        session: &mut GenerationSession<R>,
        reporter: &dyn ProgressReporter,
    ) -> Termination {
        let cancel = session.cancel_token().clone();
        loop {
            if session.is_cancelled() {
                info!(attempts = session.attempts(), "session cancelled");
                return Termination::Cancelled;
            }
            if session.attempts_exhausted() {
                warn!(
                    attempts = session.attempts(),
                    accumulated = session.accumulated_len(),
                    "attempt limit reached"
                );
                return Termination::AttemptsExhausted;
            }
            if session.budget_elapsed() {
                warn!(
                    attempts = session.attempts(),
                    accumulated = session.accumulated_len(),
                    "time budget elapsed"
                );
                return Termination::Timeout;
            }

            let attempt_index = session.begin_attempt();
            let request = self.request_builder.build(session.criteria(), attempt_index);
            debug!(attempt = attempt_index + 1, "requesting batch");

            let result = self.client.generate(request, &cancel).await;

            match result {
                Ok(batch) => {
                    let received = batch.len();
                    let added = session.merge(batch, self.identity.as_ref());
                    debug!(
                        attempt = session.attempts(),
                        received,
                        added,
                        accumulated = session.accumulated_len(),
                        "batch merged"
                    );
                    reporter.report(&session.snapshot());

                    if session.target_reached() {
                        return Termination::Completed;
                    }
                    let delay = Self::pause_for(session, self.policy.inter_attempt_delay());
                    sleep_unless_cancelled(delay, &cancel).await;
                }
                Err(GenerationError::Cancelled) if session.is_cancelled() => {
                    reporter.report(&session.snapshot());
                    info!(attempts = session.attempts(), "in-flight call cancelled");
                    return Termination::Cancelled;
                }
                Err(error) => {
                    let classification = self.policy.classify(&error);
                    reporter.report(&session.snapshot());

                    match classification.action {
                        RecoveryAction::AbortSession => {
                            warn!(
                                attempt = session.attempts(),
                                category = %classification.category,
                                error = %error,
                                "terminal error, aborting session"
                            );
                            return Termination::Failed(format!(
                                "{}: {error}",
                                classification.category
                            ));
                        }
                        RecoveryAction::RetryAfter(delay) => {
                            warn!(
                                attempt = session.attempts(),
                                category = %classification.category,
                                error = %error,
                                retry_in_ms = delay.as_millis(),
                                "attempt failed, retrying"
                            );
                            let delay = Self::pause_for(session, delay);
                            sleep_unless_cancelled(delay, &cancel).await;
                        }
                    }
                }
            }
        }
    }

    /// Delay before the next attempt, or `None` when there is nothing to wait
    /// for.
    ///
    /// Skipped when no further attempt can start, and capped at the time left
    /// in the budget so an elapsed budget is noticed without oversleeping.
    fn pause_for(session: &GenerationSession<R>, delay: Duration) -> Option<Duration> {
        if session.attempts_exhausted() {
            return None;
        }
        let delay = session.remaining().map_or(delay, |left| delay.min(left));
        (!delay.is_zero()).then_some(delay)
    }
}

/// Sleep for `delay`, cut short by cancellation.
async fn sleep_unless_cancelled(delay: Option<Duration>, cancel: &CancellationToken) {
    let Some(delay) = delay else {
        return;
    };
    select! {
        () = sleep(delay) => {}
        () = cancel.cancelled() => {
            debug!("sleep interrupted by cancellation");
        }
    }
}

/// Handle to a session spawned by [`GenerationOrchestrator::start`].
pub struct SessionHandle<R> {
    id: Uuid,
    cancel: CancellationToken,
    progress: watch::Receiver<ProgressSnapshot>,
    task: JoinHandle<SessionReport<R>>,
}

impl<R> SessionHandle<R> {
    /// Identifier shared with the session span and report
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Request cancellation. Idempotent; safe from any task or thread.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that cancels this session, for wiring to signals or UI actions
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Subscribe to progress; the receiver always holds the latest snapshot
    pub fn progress(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.clone()
    }

    /// Wait for the session to finish
    pub async fn wait(self) -> Result<SessionReport<R>, SessionError> {
        Ok(self.task.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Batch, IdentityKey, OutcomeKind};
    use crate::domain::ports::GenerationRequest;
    use crate::services::{ChannelProgressReporter, JsonRequestBuilder};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type Step = Result<Vec<&'static str>, GenerationError>;

    /// Replays scripted results; empty batches once the script runs out.
    struct Script {
        steps: Mutex<VecDeque<Step>>,
        seen: Mutex<Vec<u32>>,
    }

    impl Script {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<u32> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationClient<&'static str> for Script {
        async fn generate(
            &self,
            request: GenerationRequest,
            _cancel: &CancellationToken,
        ) -> Result<Batch<&'static str>, GenerationError> {
            self.seen.lock().unwrap().push(request.attempt_index);
            let step = self.steps.lock().unwrap().pop_front();
            step.unwrap_or_else(|| Ok(vec![])).map(Batch::new)
        }
    }

    fn orchestrator(
        script: Arc<Script>,
        policy: ClassificationPolicy,
    ) -> GenerationOrchestrator<&'static str> {
        GenerationOrchestrator::new(
            script,
            Arc::new(|s: &&'static str| IdentityKey::label(s.to_lowercase())),
            Arc::new(JsonRequestBuilder::default()),
            policy,
        )
    }

    fn criteria(target: u32) -> GenerationCriteria {
        GenerationCriteria::new(serde_json::Map::new(), target).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_on_first_batch() {
        let script = Script::new(vec![Ok(vec!["a", "b", "c"])]);
        let orch = orchestrator(Arc::clone(&script), ClassificationPolicy::bulk_organization());

        let report = orch
            .run(criteria(3), CancellationToken::new(), &NoopProgressReporter)
            .await;

        assert_eq!(report.outcome.kind(), OutcomeKind::Completed);
        assert_eq!(report.attempts, 1);
        assert_eq!(script.calls(), vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_index_counts_failed_attempts() {
        let script = Script::new(vec![
            Err(GenerationError::Network("reset".into())),
            Ok(vec!["a"]),
            Ok(vec!["b"]),
        ]);
        let orch = orchestrator(Arc::clone(&script), ClassificationPolicy::bulk_organization());

        let report = orch
            .run(criteria(2), CancellationToken::new(), &NoopProgressReporter)
            .await;

        assert_eq!(report.outcome.kind(), OutcomeKind::Completed);
        assert_eq!(script.calls(), vec![0, 1, 2]);
        assert_eq!(report.successful_attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_and_inter_attempt_delays() {
        let script = Script::new(vec![
            Ok(vec!["a"]),
            Err(GenerationError::Network("reset".into())),
            Err(GenerationError::Rejected("busy".into())),
            Ok(vec!["b"]),
        ]);
        let orch = orchestrator(script, ClassificationPolicy::bulk_organization());

        let started = tokio::time::Instant::now();
        let report = orch
            .run(criteria(2), CancellationToken::new(), &NoopProgressReporter)
            .await;

        assert_eq!(report.outcome.kind(), OutcomeKind::Completed);
        // 2s spacing + 5s transient + 3s generic
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicates_within_and_across_batches() {
        let script = Script::new(vec![Ok(vec!["a", "A", "b"]), Ok(vec!["b", "c", "d"])]);
        let orch = orchestrator(script, ClassificationPolicy::profile_search());

        let report = orch
            .run(criteria(4), CancellationToken::new(), &NoopProgressReporter)
            .await;

        assert_eq!(report.outcome.items(), &["a", "b", "c", "d"]);
        assert_eq!(report.duplicates_skipped, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_truncates_overshoot_to_target() {
        let script = Script::new(vec![Ok(vec!["a", "b"]), Ok(vec!["c", "d", "e"])]);
        let orch = orchestrator(script, ClassificationPolicy::bulk_organization());

        let report = orch
            .run(criteria(3), CancellationToken::new(), &NoopProgressReporter)
            .await;

        assert_eq!(report.outcome.kind(), OutcomeKind::Completed);
        assert_eq!(report.outcome.items(), &["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_budget_is_enforced() {
        let script = Script::new(vec![]);
        let orch = orchestrator(script, ClassificationPolicy::bulk_organization()).with_limits(
            SessionLimits {
                max_attempts: 30,
                time_budget: Some(Duration::from_secs(5)),
            },
        );

        let started = tokio::time::Instant::now();
        let report = orch
            .run(criteria(3), CancellationToken::new(), &NoopProgressReporter)
            .await;

        assert_eq!(report.outcome.kind(), OutcomeKind::PartialTimeout);
        // Attempts at t=0s, 2s, 4s; the last pause is capped at the budget
        assert_eq!(report.attempts, 3);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_emitted_for_every_attempt() {
        let script = Script::new(vec![
            Ok(vec!["a"]),
            Err(GenerationError::Timeout(Duration::from_secs(25))),
            Ok(vec!["a", "b"]),
        ]);
        let orch = orchestrator(script, ClassificationPolicy::profile_search());
        let (reporter, mut rx) = ChannelProgressReporter::channel();

        orch.run(criteria(2), CancellationToken::new(), &reporter)
            .await;
        drop(reporter);

        let mut snapshots = Vec::new();
        while let Some(snapshot) = rx.recv().await {
            snapshots.push((snapshot.attempt, snapshot.accumulated_count));
        }
        assert_eq!(snapshots, vec![(1, 1), (2, 1), (3, 2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_session_publishes_progress_and_cancels() {
        let script = Script::new(vec![Ok(vec!["a"]), Ok(vec!["b"])]);
        let orch = orchestrator(script, ClassificationPolicy::profile_search());

        let handle = orch.start(criteria(10));
        let mut progress = handle.progress();
        progress
            .wait_for(|snapshot| snapshot.attempt == 2)
            .await
            .unwrap();
        handle.cancel();
        handle.cancel();

        let report = handle.wait().await.unwrap();
        assert_eq!(report.outcome.kind(), OutcomeKind::PartialCancelled);
        assert_eq!(report.attempts, 2);
        assert_eq!(report.outcome.items(), &["a", "b"]);
    }
}
