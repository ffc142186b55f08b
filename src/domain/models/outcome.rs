//! Session outcomes and reports

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a session stopped. Input to [`Outcome::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The target was reached
    Completed,
    /// The attempt cap was hit before the target
    AttemptsExhausted,
    /// The time budget elapsed before the target
    Timeout,
    /// The caller cancelled the session
    Cancelled,
    /// A terminal remote failure aborted the session
    Failed(String),
}

/// Discriminant of an [`Outcome`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Target reached
    Completed,
    /// Attempt cap reached first
    PartialAttemptsExhausted,
    /// Time budget ran out first
    PartialTimeout,
    /// Cancelled by the caller
    PartialCancelled,
    /// Aborted by the recovery policy
    Failed,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::PartialAttemptsExhausted => "partial (attempts exhausted)",
            Self::PartialTimeout => "partial (time budget elapsed)",
            Self::PartialCancelled => "partial (cancelled)",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Terminal result of a generation session.
///
/// Every variant carries the accumulated records truncated to the target, so
/// `items().len() == min(target, accumulated)` regardless of how the session
/// ended. A failed session keeps whatever it gathered before aborting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<R> {
    /// Exactly `target` records
    Completed { items: Vec<R> },
    /// Fewer than `target` records; attempt cap reached
    PartialAttemptsExhausted { items: Vec<R> },
    /// Fewer than `target` records; time budget ran out
    PartialTimeout { items: Vec<R> },
    /// Records collected before cancellation
    PartialCancelled { items: Vec<R> },
    /// Aborted; `items` holds what was collected before the failure
    Failed { reason: String, items: Vec<R> },
}

impl<R> Outcome<R> {
    /// Truncate `items` (insertion order) to `target` and tag them with the
    /// termination kind.
    pub fn finalize(termination: Termination, mut items: Vec<R>, target: usize) -> Self {
        items.truncate(target);
        match termination {
            Termination::Completed => Self::Completed { items },
            Termination::AttemptsExhausted => Self::PartialAttemptsExhausted { items },
            Termination::Timeout => Self::PartialTimeout { items },
            Termination::Cancelled => Self::PartialCancelled { items },
            Termination::Failed(reason) => Self::Failed { reason, items },
        }
    }

    /// Variant without its payload
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Completed { .. } => OutcomeKind::Completed,
            Self::PartialAttemptsExhausted { .. } => OutcomeKind::PartialAttemptsExhausted,
            Self::PartialTimeout { .. } => OutcomeKind::PartialTimeout,
            Self::PartialCancelled { .. } => OutcomeKind::PartialCancelled,
            Self::Failed { .. } => OutcomeKind::Failed,
        }
    }

    /// Records carried by any variant
    pub fn items(&self) -> &[R] {
        match self {
            Self::Completed { items }
            | Self::PartialAttemptsExhausted { items }
            | Self::PartialTimeout { items }
            | Self::PartialCancelled { items }
            | Self::Failed { items, .. } => items,
        }
    }

    /// Take the records carried by any variant
    pub fn into_items(self) -> Vec<R> {
        match self {
            Self::Completed { items }
            | Self::PartialAttemptsExhausted { items }
            | Self::PartialTimeout { items }
            | Self::PartialCancelled { items }
            | Self::Failed { items, .. } => items,
        }
    }

    /// Human-readable explanation for anything short of completion
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Completed { .. } => None,
            Self::PartialAttemptsExhausted { .. } => {
                Some("attempt limit reached before the target".to_string())
            }
            Self::PartialTimeout { .. } => {
                Some("time budget elapsed before the target".to_string())
            }
            Self::PartialCancelled { .. } => Some("cancelled by caller".to_string()),
            Self::Failed { reason, .. } => Some(reason.clone()),
        }
    }

    /// Whether the target was reached
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Summary of a finished session: the outcome plus its bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport<R> {
    /// Session identifier
    pub session_id: Uuid,
    /// How the session ended, with its records
    pub outcome: Outcome<R>,
    /// Attempts made, including failed ones
    pub attempts: u32,
    /// Attempts that returned a batch
    pub successful_attempts: u32,
    /// Session duration in milliseconds
    pub elapsed_ms: u64,
    /// Records dropped as duplicates
    pub duplicates_skipped: usize,
}

impl<R> SessionReport<R> {
    /// Whether the caller should re-fetch authoritative state.
    ///
    /// The remote side persists whatever it generated, so any successful
    /// attempt may have changed server-side lists.
    pub fn needs_reload(&self) -> bool {
        self.successful_attempts > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_truncates_in_insertion_order() {
        let outcome = Outcome::finalize(Termination::Completed, vec![1, 2, 3, 4, 5, 6], 4);
        assert_eq!(outcome.kind(), OutcomeKind::Completed);
        assert_eq!(outcome.items(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_finalize_keeps_short_lists() {
        let outcome = Outcome::finalize(Termination::Timeout, vec![1, 2], 10);
        assert_eq!(outcome.kind(), OutcomeKind::PartialTimeout);
        assert_eq!(outcome.items().len(), 2);
    }

    #[test]
    fn test_failed_keeps_partial_items_and_reason() {
        let outcome = Outcome::finalize(
            Termination::Failed("rate limited".into()),
            vec!["a", "b", "c"],
            10,
        );
        assert_eq!(outcome.kind(), OutcomeKind::Failed);
        assert_eq!(outcome.reason().as_deref(), Some("rate limited"));
        assert_eq!(outcome.into_items(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reason_and_success() {
        let done: Outcome<u8> = Outcome::finalize(Termination::Completed, vec![], 1);
        assert!(done.is_success());
        assert!(done.reason().is_none());

        let cancelled: Outcome<u8> = Outcome::finalize(Termination::Cancelled, vec![], 1);
        assert!(!cancelled.is_success());
        assert_eq!(cancelled.reason().as_deref(), Some("cancelled by caller"));
    }

    #[test]
    fn test_serialized_tag() {
        let outcome = Outcome::finalize(Termination::AttemptsExhausted, vec![1u8], 5);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "partial_attempts_exhausted");
        assert_eq!(json["items"], serde_json::json!([1]));
    }

    #[test]
    fn test_needs_reload() {
        let report = SessionReport {
            session_id: Uuid::new_v4(),
            outcome: Outcome::<u8>::finalize(Termination::Cancelled, vec![], 3),
            attempts: 2,
            successful_attempts: 0,
            elapsed_ms: 10,
            duplicates_skipped: 0,
        };
        assert!(!report.needs_reload());

        let report = SessionReport {
            successful_attempts: 1,
            ..report
        };
        assert!(report.needs_reload());
    }
}
