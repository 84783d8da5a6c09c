//! The multi-version value store.
//!
//! One version chain per key plus the global version counter, behind a
//! single `RwLock`. The counter lives inside the same lock as the chains,
//! so a write's counter bump and its append are observed together: a
//! snapshot taken at version `v` sees every version with id `<= v`, and
//! never a version the counter has not yet reached.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use lattice_core::{Key, Value, Version, VersionedValue};

use crate::chain::{StoredVersion, VersionChain};

/// In-memory multi-version store.
///
/// Writers append fresh versions under the write lock; readers resolve
/// snapshot-bounded lookups under the read lock and never block each other.
/// A key absent from the map is indistinguishable from one never written.
pub struct VersionStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    chains: FxHashMap<Key, VersionChain>,
    /// Last version id issued; 0 means nothing has been written yet.
    last_version: Version,
}

impl VersionStore {
    /// Create an empty store with the counter at zero.
    pub fn new() -> Self {
        VersionStore {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Append a new version of `key` and return its freshly issued id.
    pub fn write(&self, key: impl Into<Key>, value: impl Into<Value>) -> Version {
        let value = value.into();
        self.append(key.into(), |version| StoredVersion::put(value, version))
    }

    /// Append a deletion marker for `key` and return its id.
    ///
    /// The tombstone consumes a version id like any other write; reads at
    /// snapshots that resolve to it report the key as absent.
    pub fn write_tombstone(&self, key: impl Into<Key>) -> Version {
        self.append(key.into(), StoredVersion::tombstone)
    }

    fn append(&self, key: Key, make: impl FnOnce(Version) -> StoredVersion) -> Version {
        let mut inner = self.inner.write();
        inner.last_version += 1;
        let version = inner.last_version;
        inner
            .chains
            .entry(key)
            .or_default()
            .push(make(version));
        version
    }

    /// Read the value of `key` visible at `snapshot`.
    ///
    /// Returns the payload of the highest-id version with id `<= snapshot`,
    /// or `None` if the key has no such version or that version is a
    /// tombstone.
    pub fn read(&self, key: &str, snapshot: Version) -> Option<Value> {
        self.read_versioned(key, snapshot).map(|vv| vv.value)
    }

    /// Read the versioned record of `key` visible at `snapshot`.
    ///
    /// Like [`read`](Self::read) but keeps the version id and timestamp,
    /// which the transaction layer records for commit-time validation.
    pub fn read_versioned(&self, key: &str, snapshot: Version) -> Option<VersionedValue> {
        let inner = self.inner.read();
        inner
            .chains
            .get(key)
            .and_then(|chain| chain.visible_at(snapshot))
            .filter(|sv| !sv.is_tombstone())
            .map(|sv| sv.versioned().clone())
    }

    /// Get the newest version id of `key`, tombstones included.
    pub fn latest_version(&self, key: &str) -> Option<Version> {
        let inner = self.inner.read();
        inner.chains.get(key).and_then(VersionChain::latest_version)
    }

    /// Get the current value of the global version counter.
    pub fn current_version(&self) -> Version {
        self.inner.read().last_version
    }

    /// Get a stable copy of `key`'s version sequence in ascending id order,
    /// deletion markers included. Empty if the key was never written or GC
    /// removed it entirely.
    pub fn all_versions(&self, key: &str) -> Vec<VersionedValue> {
        let inner = self.inner.read();
        inner
            .chains
            .get(key)
            .map(|chain| chain.versions().map(|sv| sv.versioned().clone()).collect())
            .unwrap_or_default()
    }

    /// Discard versions no snapshot at or above `min_snapshot` can resolve.
    ///
    /// Per key, retains the version visible at the watermark plus everything
    /// newer. A key left holding only a tombstone at or below the watermark
    /// is removed outright. Returns the number of versions discarded.
    pub fn prune(&self, min_snapshot: Version) -> usize {
        let mut inner = self.inner.write();
        let mut pruned = 0;
        inner.chains.retain(|key, chain| {
            pruned += chain.prune(min_snapshot);
            if chain.fully_deleted(min_snapshot) {
                pruned += chain.len();
                debug!(key = %key, "dropped fully deleted key");
                false
            } else {
                !chain.is_empty()
            }
        });
        debug!(min_snapshot, pruned, "pruned store");
        pruned
    }

    /// Number of keys currently holding at least one version.
    pub fn key_count(&self) -> usize {
        self.inner.read().chains.len()
    }

    /// Total number of versions across all keys.
    pub fn version_count(&self) -> usize {
        let inner = self.inner.read();
        inner.chains.values().map(VersionChain::len).sum()
    }
}

impl Default for VersionStore {
    fn default() -> Self {
        Self::new()
    }
}
