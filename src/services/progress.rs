//! Progress reporter implementations.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::domain::models::ProgressSnapshot;
use crate::domain::ports::ProgressReporter;

impl<F> ProgressReporter for F
where
    F: Fn(&ProgressSnapshot) + Send + Sync,
{
    fn report(&self, snapshot: &ProgressSnapshot) {
        self(snapshot);
    }
}

/// Discards every snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressReporter;

impl ProgressReporter for NoopProgressReporter {
    fn report(&self, _snapshot: &ProgressSnapshot) {}
}

/// Logs each snapshot at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressReporter;

impl ProgressReporter for TracingProgressReporter {
    fn report(&self, snapshot: &ProgressSnapshot) {
        info!(
            accumulated = snapshot.accumulated_count,
            target_count = snapshot.target_count,
            attempt = snapshot.attempt,
            max_attempts = snapshot.max_attempts,
            elapsed_ms = snapshot.elapsed_ms,
            remaining_ms = ?snapshot.remaining_ms,
            duplicates_skipped = snapshot.duplicates_skipped,
            "generation progress"
        );
    }
}

/// Forwards every snapshot, in order, to an unbounded channel.
///
/// Snapshots sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelProgressReporter {
    tx: mpsc::UnboundedSender<ProgressSnapshot>,
}

impl ChannelProgressReporter {
    /// Reporter sending to `tx`
    pub fn new(tx: mpsc::UnboundedSender<ProgressSnapshot>) -> Self {
        Self { tx }
    }

    /// Reporter plus the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressSnapshot>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProgressReporter for ChannelProgressReporter {
    fn report(&self, snapshot: &ProgressSnapshot) {
        let _ = self.tx.send(*snapshot);
    }
}

/// Publishes the latest snapshot on a watch channel.
///
/// Subscribers always see the most recent state; intermediate snapshots may be
/// skipped by slow readers.
#[derive(Debug, Clone)]
pub struct WatchProgressReporter {
    tx: Arc<watch::Sender<ProgressSnapshot>>,
}

impl WatchProgressReporter {
    /// Reporter whose channel starts at `initial`
    pub fn new(initial: ProgressSnapshot) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// New receiver holding the latest snapshot
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.tx.subscribe()
    }
}

impl ProgressReporter for WatchProgressReporter {
    fn report(&self, snapshot: &ProgressSnapshot) {
        self.tx.send_replace(*snapshot);
    }
}

/// Forwards each snapshot to several reporters, in registration order
#[derive(Clone, Default)]
pub struct FanoutProgressReporter {
    reporters: Vec<Arc<dyn ProgressReporter>>,
}

impl FanoutProgressReporter {
    /// Reporter with no targets
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target
    #[must_use]
    pub fn with(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporters.push(reporter);
        self
    }
}

impl ProgressReporter for FanoutProgressReporter {
    fn report(&self, snapshot: &ProgressSnapshot) {
        for reporter in &self.reporters {
            reporter.report(snapshot);
        }
    }
}
