//! Explicit state of one generation session.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::models::{
    Batch, GenerationCriteria, Outcome, ProgressSnapshot, SessionReport, Termination,
};
use crate::domain::ports::IdentityExtractor;
use crate::services::AccumulatedSet;

/// Mutable state of a running session, owned by the orchestrator loop.
///
/// The cancellation token is the only part that other tasks may touch.
#[derive(Debug)]
pub struct GenerationSession<R> {
    id: Uuid,
    criteria: GenerationCriteria,
    attempts: u32,
    successful_attempts: u32,
    max_attempts: u32,
    started_at: Instant,
    time_budget: Option<Duration>,
    cancel: CancellationToken,
    accumulated: AccumulatedSet<R>,
}

impl<R> GenerationSession<R> {
    /// Fresh session; the clock starts now
    pub fn new(
        id: Uuid,
        criteria: GenerationCriteria,
        max_attempts: u32,
        time_budget: Option<Duration>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            criteria,
            attempts: 0,
            successful_attempts: 0,
            max_attempts,
            started_at: Instant::now(),
            time_budget,
            cancel,
            accumulated: AccumulatedSet::new(),
        }
    }

    /// Session identifier
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Criteria the session was started with
    pub const fn criteria(&self) -> &GenerationCriteria {
        &self.criteria
    }

    /// Attempts started so far, successful or not
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Token shared with the session handle
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Unique records collected so far
    pub fn accumulated_len(&self) -> usize {
        self.accumulated.len()
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the attempt cap has been reached
    pub const fn attempts_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Wall-clock time since the session started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Time left in the budget; `None` when the session has no budget
    pub fn remaining(&self) -> Option<Duration> {
        self.time_budget
            .map(|budget| budget.saturating_sub(self.elapsed()))
    }

    /// Whether a time budget is set and used up
    pub fn budget_elapsed(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Whether enough unique records have been collected
    pub fn target_reached(&self) -> bool {
        self.accumulated.len() >= self.criteria.target_len()
    }

    /// Count a new attempt and return its zero-based rotation index
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts - 1
    }

    /// Merge a successful batch, skipping identities already present
    /// (including repeats within the batch). Returns the number added.
    pub fn merge(&mut self, batch: Batch<R>, identity: &dyn IdentityExtractor<R>) -> usize {
        self.successful_attempts += 1;
        let mut added = 0;
        for record in batch.items {
            let key = identity.key(&record);
            if self.accumulated.insert(key, record) {
                added += 1;
            }
        }
        added
    }

    /// Current progress
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            accumulated_count: self.accumulated.len(),
            target_count: self.criteria.target(),
            attempt: self.attempts,
            max_attempts: self.max_attempts,
            elapsed_ms: duration_ms(self.elapsed()),
            remaining_ms: self.remaining().map(duration_ms),
            duplicates_skipped: self.accumulated.duplicates_skipped(),
        }
    }

    /// Close the session: truncate to target and build the report
    pub fn finish(self, termination: Termination) -> SessionReport<R> {
        let elapsed_ms = duration_ms(self.elapsed());
        let duplicates_skipped = self.accumulated.duplicates_skipped();
        let target = self.criteria.target_len();
        SessionReport {
            session_id: self.id,
            outcome: Outcome::finalize(termination, self.accumulated.into_records(), target),
            attempts: self.attempts,
            successful_attempts: self.successful_attempts,
            elapsed_ms,
            duplicates_skipped,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
