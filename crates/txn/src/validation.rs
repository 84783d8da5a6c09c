//! Commit-time validation of a transaction's read set.
//!
//! First-committer-wins is based on the read set: a transaction fails
//! validation iff some key it read now has a stored version newer than the
//! one it observed. Blind writes (write without read) never conflict, and
//! write skew is allowed.

use lattice_core::{Key, Version};
use lattice_storage::VersionStore;

use crate::transaction::Transaction;

/// A read-set entry invalidated by a newer committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The key that was read
    pub key: Key,
    /// Version id the transaction observed
    pub observed: Version,
    /// Newest version id the store holds for the key
    pub latest: Version,
}

/// Outcome of validating a transaction against the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// All invalidated reads found, in read-set iteration order
    pub conflicts: Vec<Conflict>,
}

impl ValidationResult {
    /// A result with no conflicts.
    pub fn clean() -> Self {
        ValidationResult::default()
    }

    /// Check whether validation passed.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of invalidated reads.
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

/// Validate a transaction's read set against the store's current state.
///
/// For each observed read, the check compares the key's newest stored id
/// against the observed id; only a strictly newer id is a conflict. A key
/// whose chain disappeared entirely (GC of a fully deleted key) has no
/// newer version and does not conflict.
pub fn validate_read_set(txn: &Transaction, store: &VersionStore) -> ValidationResult {
    let mut result = ValidationResult::clean();
    for (key, read) in txn.read_set() {
        if let Some(latest) = store.latest_version(key) {
            if latest > read.version {
                result.conflicts.push(Conflict {
                    key: key.clone(),
                    observed: read.version,
                    latest,
                });
            }
        }
    }
    result
}
