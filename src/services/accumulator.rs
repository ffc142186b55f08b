//! Deduplicated, insertion-ordered working set.

use std::collections::HashMap;

use crate::domain::models::IdentityKey;

/// Records collected across attempts, one per identity.
///
/// Invariants:
/// - no two entries have matching identity keys (see [`IdentityKey::matches`])
/// - `len()` never decreases
/// - iteration yields entries in insertion order
#[derive(Debug, Clone)]
pub struct AccumulatedSet<R> {
    entries: Vec<(IdentityKey, R)>,
    by_registry: HashMap<String, usize>,
    by_label: HashMap<String, Vec<usize>>,
    duplicates_skipped: usize,
}

impl<R> AccumulatedSet<R> {
    /// Empty set
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_registry: HashMap::new(),
            by_label: HashMap::new(),
            duplicates_skipped: 0,
        }
    }

    /// Unique records held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no record has been kept
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records skipped so far because their identity was already present
    pub fn duplicates_skipped(&self) -> usize {
        self.duplicates_skipped
    }

    /// Whether an entry with an identity matching `key` is present
    pub fn contains(&self, key: &IdentityKey) -> bool {
        if let Some(id) = key.registry_id() {
            if self.by_registry.contains_key(id) {
                return true;
            }
        }

        self.by_label.get(key.label_str()).is_some_and(|indexes| {
            indexes
                .iter()
                .any(|&i| self.entries[i].0.matches(key))
        })
    }

    /// Insert `record` unless its identity is already present.
    ///
    /// Returns `true` when the record was added.
    pub fn insert(&mut self, key: IdentityKey, record: R) -> bool {
        if self.contains(&key) {
            self.duplicates_skipped += 1;
            return false;
        }

        let index = self.entries.len();
        if let Some(id) = key.registry_id() {
            self.by_registry.insert(id.to_string(), index);
        }
        self.by_label
            .entry(key.label_str().to_string())
            .or_default()
            .push(index);
        self.entries.push((key, record));
        true
    }

    /// Records in insertion order
    pub fn into_records(self) -> Vec<R> {
        self.entries.into_iter().map(|(_, record)| record).collect()
    }
}

impl<R> Default for AccumulatedSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_duplicate_labels() {
        let mut set = AccumulatedSet::new();
        assert!(set.insert(IdentityKey::label("jane"), 1));
        assert!(set.insert(IdentityKey::label("john"), 2));
        assert!(!set.insert(IdentityKey::label("jane"), 3));

        assert_eq!(set.len(), 2);
        assert_eq!(set.duplicates_skipped(), 1);
        assert_eq!(set.into_records(), vec![1, 2]);
    }

    #[test]
    fn test_registry_ids_distinguish_same_names() {
        let mut set = AccumulatedSet::new();
        assert!(set.insert(IdentityKey::with_registry("acme", "111"), "a"));
        assert!(set.insert(IdentityKey::with_registry("acme", "222"), "b"));
        assert!(!set.insert(IdentityKey::with_registry("acme corp", "111"), "c"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_name_fallback_against_registry_entries() {
        let mut set = AccumulatedSet::new();
        set.insert(IdentityKey::with_registry("acme", "111"), "a");
        assert!(!set.insert(IdentityKey::label("acme"), "b"));
        assert!(set.insert(IdentityKey::label("globex"), "c"));
        assert!(!set.insert(IdentityKey::with_registry("globex", "333"), "d"));
        assert_eq!(set.into_records(), vec!["a", "c"]);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut set = AccumulatedSet::new();
        for name in ["c", "a", "b", "a", "d"] {
            set.insert(IdentityKey::label(name), name);
        }
        assert_eq!(set.into_records(), vec!["c", "a", "b", "d"]);
    }
}
