//! Progress reporting port

use crate::domain::models::ProgressSnapshot;

/// Receives interim session state.
///
/// Called from the session's task after every completed attempt, in attempt
/// order. Implementations should return quickly; the loop waits for them.
pub trait ProgressReporter: Send + Sync {
    /// Called once per completed attempt, in order
    fn report(&self, snapshot: &ProgressSnapshot);
}
