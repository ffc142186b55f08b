//! Record identity port

use crate::domain::models::IdentityKey;

/// Maps a generated record to the key used to detect duplicates.
///
/// Implementations must be pure, total and deterministic: the same record
/// always yields the same key and no record is ever rejected.
pub trait IdentityExtractor<R>: Send + Sync {
    /// Identity of `record`
    fn key(&self, record: &R) -> IdentityKey;
}
