//! Transaction manager: issues transactions, mediates reads and writes
//! against the store and the per-transaction buffers, and runs the
//! validate-and-apply commit protocol.
//!
//! ## Commit sequence
//!
//! ```text
//! 1. Remove the transaction from the live set (unknown id -> error)
//! 2. validate_read_set() — first-committer-wins check
//! 3. IF conflicts: mark aborted, record stats, return Conflict
//! 4. Apply the write buffer through the store (fresh id per write)
//! 5. Mark committed, record stats, return the store's version
//! ```
//!
//! The manager's mutex covers snapshot capture at begin, the whole
//! validate-and-apply window, abort, and GC. Without it, two commits could
//! both validate against the same pre-image and both apply, and a begin
//! landing mid-apply could observe half a commit. Lock order is always
//! manager then store; the store lock is never held while taking the
//! manager lock.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use lattice_core::{Error, Key, Result, TxnId, Value, Version};
use lattice_storage::VersionStore;

use crate::stats::{Counters, TxnStats};
use crate::transaction::{Buffered, Transaction};
use crate::validation::{validate_read_set, ValidationResult};

/// Commit failure modes.
///
/// A conflict is the expected outcome of optimistic concurrency under
/// contention, not an exceptional condition: callers retry the whole
/// transaction from a fresh snapshot.
#[derive(Debug, Clone, Error)]
pub enum CommitError {
    /// Validation found at least one read invalidated by a newer write.
    #[error("commit failed: {} conflict(s)", .0.conflict_count())]
    Conflict(ValidationResult),

    /// The transaction id is not in the live set.
    #[error("unknown transaction {0}")]
    UnknownTransaction(TxnId),
}

impl CommitError {
    /// Check whether this failure is a retryable conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CommitError::Conflict(_))
    }
}

/// Tuning knobs for the manager. The defaults disable both limits.
#[derive(Debug, Clone, Default)]
pub struct ManagerConfig {
    /// Upper bound on concurrently live transactions; `None` = unbounded.
    pub max_live_transactions: Option<usize>,
    /// Run a GC pass after every this many commits; `None` = manual only.
    pub auto_gc_interval: Option<u64>,
}

/// Coordinates transactions over a shared [`VersionStore`].
///
/// The manager owns every live transaction; a transaction leaves the live
/// set the moment its commit or abort completes, after which its id is
/// unknown to every operation.
pub struct TransactionManager {
    store: Arc<VersionStore>,
    config: ManagerConfig,
    inner: Mutex<ManagerInner>,
}

#[derive(Default)]
struct ManagerInner {
    next_txn_id: TxnId,
    live: FxHashMap<TxnId, Transaction>,
    counters: Counters,
    commits_since_gc: u64,
}

impl TransactionManager {
    /// Create a manager over `store` with default configuration.
    pub fn new(store: Arc<VersionStore>) -> Self {
        Self::with_config(store, ManagerConfig::default())
    }

    /// Create a manager with explicit configuration.
    pub fn with_config(store: Arc<VersionStore>, config: ManagerConfig) -> Self {
        TransactionManager {
            store,
            config,
            inner: Mutex::new(ManagerInner::default()),
        }
    }

    /// The store this manager coordinates.
    pub fn store(&self) -> &Arc<VersionStore> {
        &self.store
    }

    /// Begin a transaction pinned to the store's current version.
    ///
    /// The snapshot is captured under the manager lock, so every version
    /// with id at or below it is fully applied and visible.
    pub fn begin(&self) -> Result<TxnId> {
        let mut inner = self.inner.lock();
        if let Some(limit) = self.config.max_live_transactions {
            if inner.live.len() >= limit {
                return Err(Error::TransactionLimit(limit));
            }
        }
        inner.next_txn_id += 1;
        let txn = inner.next_txn_id;
        let snapshot = self.store.current_version();
        inner.live.insert(txn, Transaction::new(txn, snapshot));
        debug!(txn, snapshot, "transaction started");
        Ok(txn)
    }

    /// Read `key` within a transaction.
    ///
    /// The write buffer is consulted first (read-your-writes, no read-set
    /// entry), then the store at the transaction's snapshot. A read served
    /// by the store records the observed `(version, value)` for commit-time
    /// validation; an absent key records nothing.
    pub fn read(&self, txn: TxnId, key: &str) -> Result<Option<Value>> {
        let mut inner = self.inner.lock();
        let tx = inner
            .live
            .get_mut(&txn)
            .ok_or(Error::UnknownTransaction(txn))?;

        if let Some(buffered) = tx.buffered(key) {
            debug!(txn, key, "read from write buffer");
            return Ok(match buffered {
                Buffered::Write(value) => Some(value.clone()),
                Buffered::Delete => None,
            });
        }

        match self.store.read_versioned(key, tx.snapshot_version()) {
            Some(observed) => {
                debug!(txn, key, version = observed.version, "snapshot read");
                let value = observed.value.clone();
                tx.record_read(key.to_owned(), observed.version, observed.value)?;
                Ok(Some(value))
            }
            None => {
                debug!(txn, key, "snapshot read: absent");
                Ok(None)
            }
        }
    }

    /// Buffer a write within a transaction. The store is untouched until
    /// commit.
    pub fn write(&self, txn: TxnId, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        let mut inner = self.inner.lock();
        let tx = inner
            .live
            .get_mut(&txn)
            .ok_or(Error::UnknownTransaction(txn))?;
        let key = key.into();
        debug!(txn, key = %key, "buffered write");
        tx.buffer_write(key, value.into())
    }

    /// Buffer a delete within a transaction; applied as a tombstone on
    /// commit.
    pub fn delete(&self, txn: TxnId, key: impl Into<Key>) -> Result<()> {
        let mut inner = self.inner.lock();
        let tx = inner
            .live
            .get_mut(&txn)
            .ok_or(Error::UnknownTransaction(txn))?;
        let key = key.into();
        debug!(txn, key = %key, "buffered delete");
        tx.buffer_delete(key)
    }

    /// Commit a transaction: validate the read set, then apply the write
    /// buffer.
    ///
    /// On success every buffered write lands in the store under a fresh
    /// version id, all of them visible as a unit to any later `begin`, and
    /// the store's resulting version is returned. On conflict the
    /// transaction is aborted and the invalidated reads are reported.
    pub fn commit(&self, txn: TxnId) -> std::result::Result<Version, CommitError> {
        let mut inner = self.inner.lock();
        let mut tx = inner
            .live
            .remove(&txn)
            .ok_or(CommitError::UnknownTransaction(txn))?;

        let validation = validate_read_set(&tx, &self.store);
        if !validation.is_clean() {
            tx.mark_aborted();
            inner
                .counters
                .record_abort(tx.duration().unwrap_or_default());
            warn!(
                txn,
                conflicts = validation.conflict_count(),
                "commit failed validation"
            );
            return Err(CommitError::Conflict(validation));
        }

        for (key, value) in tx.write_set() {
            self.store.write(key.clone(), value.clone());
        }
        for key in tx.delete_set() {
            self.store.write_tombstone(key.clone());
        }
        tx.mark_committed();
        inner
            .counters
            .record_commit(tx.duration().unwrap_or_default());
        let version = self.store.current_version();
        debug!(txn, version, "transaction committed");

        if let Some(interval) = self.config.auto_gc_interval {
            inner.commits_since_gc += 1;
            if inner.commits_since_gc >= interval {
                inner.commits_since_gc = 0;
                self.gc_locked(&mut inner);
            }
        }

        Ok(version)
    }

    /// Abort a transaction, discarding its buffers without touching the
    /// store.
    pub fn abort(&self, txn: TxnId) -> Result<()> {
        let mut inner = self.inner.lock();
        let mut tx = inner
            .live
            .remove(&txn)
            .ok_or(Error::UnknownTransaction(txn))?;
        tx.mark_aborted();
        inner
            .counters
            .record_abort(tx.duration().unwrap_or_default());
        debug!(txn, "transaction aborted");
        Ok(())
    }

    /// Reclaim versions no live or future snapshot can resolve.
    ///
    /// The watermark is the minimum snapshot over live transactions, or the
    /// store's current version when none are live. Returns the number of
    /// versions discarded.
    pub fn gc(&self) -> usize {
        let mut inner = self.inner.lock();
        self.gc_locked(&mut inner)
    }

    fn gc_locked(&self, inner: &mut ManagerInner) -> usize {
        let min_snapshot = inner
            .live
            .values()
            .map(Transaction::snapshot_version)
            .min()
            .unwrap_or_else(|| self.store.current_version());
        let pruned = self.store.prune(min_snapshot);
        debug!(min_snapshot, pruned, "gc pass");
        pruned
    }

    /// Point-in-time counters and latency summary.
    pub fn stats(&self) -> TxnStats {
        let inner = self.inner.lock();
        inner.counters.snapshot(inner.live.len())
    }

    /// Number of currently live transactions.
    pub fn live_transactions(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Snapshot version a live transaction is pinned to.
    pub fn snapshot_of(&self, txn: TxnId) -> Result<Version> {
        let inner = self.inner.lock();
        inner
            .live
            .get(&txn)
            .map(Transaction::snapshot_version)
            .ok_or(Error::UnknownTransaction(txn))
    }
}
