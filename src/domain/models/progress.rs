//! Progress snapshots

use serde::{Deserialize, Serialize};

/// Interim state of a running session, emitted after every completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Unique records accumulated so far
    pub accumulated_count: usize,

    /// Number of unique records requested
    pub target_count: u32,

    /// Attempts made so far (1-based)
    pub attempt: u32,

    /// Attempt cap for the session
    pub max_attempts: u32,

    /// Milliseconds since the session started
    pub elapsed_ms: u64,

    /// Milliseconds left in the time budget, when one is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_ms: Option<u64>,

    /// Records skipped so far because their identity was already present
    pub duplicates_skipped: usize,
}

impl ProgressSnapshot {
    /// Snapshot of a session that has not made any attempt yet
    pub fn initial(target_count: u32, max_attempts: u32, remaining_ms: Option<u64>) -> Self {
        Self {
            accumulated_count: 0,
            target_count,
            attempt: 0,
            max_attempts,
            elapsed_ms: 0,
            remaining_ms,
            duplicates_skipped: 0,
        }
    }
}
