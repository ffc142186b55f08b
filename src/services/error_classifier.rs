//! Error classification and recovery policy
//!
//! Every failed generation call is mapped to an [`ErrorCategory`], and the
//! session's [`ClassificationPolicy`] decides whether to wait and retry or to
//! abort. The two named policies are kept separate: the bulk organization
//! search treats throttling as saturating the whole search, while the profile
//! search waits it out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::domain::errors::GenerationError;
use crate::domain::models::PolicyName;

/// Failure category of a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Network hiccup, timeout or generic 5xx
    Transient,
    /// Upstream throttling
    RateLimited,
    /// Upstream down as a whole
    Unavailable,
    /// Credentials missing or rejected
    Unauthorized,
    /// Nothing found, or the target is private/restricted
    NotFoundOrRestricted,
    /// Anything else
    Generic,
}

impl ErrorCategory {
    /// Map a call failure to its category
    pub fn of(error: &GenerationError) -> Self {
        match error {
            GenerationError::RateLimited => Self::RateLimited,
            GenerationError::Unavailable(_) => Self::Unavailable,
            GenerationError::Unauthorized(_) | GenerationError::MissingToken => Self::Unauthorized,
            GenerationError::Forbidden(_) | GenerationError::NotFound(_) => {
                Self::NotFoundOrRestricted
            }
            GenerationError::Network(_)
            | GenerationError::Timeout(_)
            | GenerationError::ServerError(_, _) => Self::Transient,
            GenerationError::InvalidRequest(_)
            | GenerationError::Rejected(_)
            | GenerationError::Decode(_)
            | GenerationError::Cancelled
            | GenerationError::Unknown(_, _) => Self::Generic,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Transient => "transient",
            Self::RateLimited => "rate_limited",
            Self::Unavailable => "unavailable",
            Self::Unauthorized => "unauthorized",
            Self::NotFoundOrRestricted => "not_found_or_restricted",
            Self::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// What the loop does after a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Sleep for the given delay, then try again
    RetryAfter(Duration),
    /// Stop the session and surface the failure
    AbortSession,
}

/// Result of classifying one failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// What kind of failure it was
    pub category: ErrorCategory,
    /// What the session does next
    pub action: RecoveryAction,
}

/// Table of recovery actions per category plus the pause between two
/// successful attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPolicy {
    name: &'static str,
    transient: RecoveryAction,
    rate_limited: RecoveryAction,
    unavailable: RecoveryAction,
    unauthorized: RecoveryAction,
    not_found_or_restricted: RecoveryAction,
    generic: RecoveryAction,
    inter_attempt_delay: Duration,
}

impl ClassificationPolicy {
    /// Bulk organization search.
    ///
    /// Throttling and outages abort immediately; network trouble waits 5s,
    /// anything else 3s. Successful attempts are spaced 2s apart.
    pub const fn bulk_organization() -> Self {
        Self {
            name: "bulk_organization",
            transient: RecoveryAction::RetryAfter(Duration::from_secs(5)),
            rate_limited: RecoveryAction::AbortSession,
            unavailable: RecoveryAction::AbortSession,
            unauthorized: RecoveryAction::AbortSession,
            not_found_or_restricted: RecoveryAction::AbortSession,
            generic: RecoveryAction::RetryAfter(Duration::from_secs(3)),
            inter_attempt_delay: Duration::from_secs(2),
        }
    }

    /// Profile and social search.
    ///
    /// Auth and visibility failures abort immediately; throttling waits 15s,
    /// network trouble 7s, anything else 4s. Successful attempts are spaced
    /// 3s apart.
    pub const fn profile_search() -> Self {
        Self {
            name: "profile_search",
            transient: RecoveryAction::RetryAfter(Duration::from_secs(7)),
            rate_limited: RecoveryAction::RetryAfter(Duration::from_secs(15)),
            unavailable: RecoveryAction::AbortSession,
            unauthorized: RecoveryAction::AbortSession,
            not_found_or_restricted: RecoveryAction::AbortSession,
            generic: RecoveryAction::RetryAfter(Duration::from_secs(4)),
            inter_attempt_delay: Duration::from_secs(3),
        }
    }

    /// Policy selected by configuration
    pub const fn named(name: PolicyName) -> Self {
        match name {
            PolicyName::BulkOrganization => Self::bulk_organization(),
            PolicyName::ProfileSearch => Self::profile_search(),
        }
    }

    /// Policy name, as logged
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Pause after a successful attempt that fell short
    pub const fn inter_attempt_delay(&self) -> Duration {
        self.inter_attempt_delay
    }

    /// Override the recovery action for one category
    #[must_use]
    pub const fn with_action(mut self, category: ErrorCategory, action: RecoveryAction) -> Self {
        match category {
            ErrorCategory::Transient => self.transient = action,
            ErrorCategory::RateLimited => self.rate_limited = action,
            ErrorCategory::Unavailable => self.unavailable = action,
            ErrorCategory::Unauthorized => self.unauthorized = action,
            ErrorCategory::NotFoundOrRestricted => self.not_found_or_restricted = action,
            ErrorCategory::Generic => self.generic = action,
        }
        self
    }

    /// Override the pause between successful attempts
    #[must_use]
    pub const fn with_inter_attempt_delay(mut self, delay: Duration) -> Self {
        self.inter_attempt_delay = delay;
        self
    }

    /// Recovery action for `category`
    pub const fn action_for(&self, category: ErrorCategory) -> RecoveryAction {
        match category {
            ErrorCategory::Transient => self.transient,
            ErrorCategory::RateLimited => self.rate_limited,
            ErrorCategory::Unavailable => self.unavailable,
            ErrorCategory::Unauthorized => self.unauthorized,
            ErrorCategory::NotFoundOrRestricted => self.not_found_or_restricted,
            ErrorCategory::Generic => self.generic,
        }
    }

    /// Categorize `error` and look up its recovery action
    pub fn classify(&self, error: &GenerationError) -> Classification {
        let category = ErrorCategory::of(error);
        Classification {
            category,
            action: self.action_for(category),
        }
    }
}
