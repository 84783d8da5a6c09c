//! Transaction working state.
//!
//! `Transaction` is a pure data holder: it carries the snapshot version,
//! the reads observed from the store, and the buffered writes and deletes.
//! It performs no I/O — the manager resolves reads against the store and
//! applies or discards the buffers at commit/abort.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use lattice_core::{Error, Key, Result, TxnId, Value, Version};

/// Lifecycle of a transaction.
///
/// `Committed` and `Aborted` are terminal: once reached, no further reads
/// or writes may be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Transaction is executing; reads and writes may be recorded
    Active,
    /// Transaction committed successfully
    Committed,
    /// Transaction was aborted, by conflict or by request
    Aborted,
}

impl TransactionStatus {
    /// Check whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Active)
    }

    /// Lowercase name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Active => "active",
            TransactionStatus::Committed => "committed",
            TransactionStatus::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read observed from the store: the version id visible at the
/// transaction's snapshot and the value it carried.
///
/// The id is what commit-time validation checks; the value is kept so the
/// observation is self-describing in logs and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedRead {
    /// Version id that was visible at the snapshot
    pub version: Version,
    /// Value carried by that version
    pub value: Value,
}

/// What the write buffer holds for a key, if anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Buffered<'a> {
    /// The transaction buffered a write of this value
    Write(&'a Value),
    /// The transaction buffered a delete
    Delete,
}

/// Working state of one transaction.
///
/// Reads resolved from the write buffer do not enter the read set — only
/// observations of the store itself are validated at commit. A later
/// buffered write for a key replaces the earlier one; a buffered delete
/// cancels a buffered write and vice versa.
pub struct Transaction {
    tx_id: TxnId,
    snapshot_version: Version,
    read_set: FxHashMap<Key, ObservedRead>,
    write_set: FxHashMap<Key, Value>,
    delete_set: HashSet<Key>,
    status: TransactionStatus,
    start_time: Instant,
    end_time: Option<Instant>,
}

impl Transaction {
    /// Create an active transaction pinned to `snapshot_version`.
    pub fn new(tx_id: TxnId, snapshot_version: Version) -> Self {
        Transaction {
            tx_id,
            snapshot_version,
            read_set: FxHashMap::default(),
            write_set: FxHashMap::default(),
            delete_set: HashSet::new(),
            status: TransactionStatus::Active,
            start_time: Instant::now(),
            end_time: None,
        }
    }

    /// Transaction id.
    pub fn tx_id(&self) -> TxnId {
        self.tx_id
    }

    /// Version counter value observed at begin; defines visibility.
    pub fn snapshot_version(&self) -> Version {
        self.snapshot_version
    }

    /// Current lifecycle status.
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Check whether the transaction is still active.
    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    /// Keys read from the store with the versions observed.
    pub fn read_set(&self) -> &FxHashMap<Key, ObservedRead> {
        &self.read_set
    }

    /// Buffered writes.
    pub fn write_set(&self) -> &FxHashMap<Key, Value> {
        &self.write_set
    }

    /// Buffered deletes.
    pub fn delete_set(&self) -> &HashSet<Key> {
        &self.delete_set
    }

    /// Check whether the transaction buffered no writes or deletes.
    pub fn is_read_only(&self) -> bool {
        self.write_set.is_empty() && self.delete_set.is_empty()
    }

    /// Resolve a key against the write buffer (read-your-writes).
    ///
    /// Returns `None` when the transaction has not touched the key and the
    /// read should fall through to the store.
    pub fn buffered(&self, key: &str) -> Option<Buffered<'_>> {
        if let Some(value) = self.write_set.get(key) {
            return Some(Buffered::Write(value));
        }
        if self.delete_set.contains(key) {
            return Some(Buffered::Delete);
        }
        None
    }

    /// Record a read observed from the store.
    ///
    /// Overwrites any prior entry for the key: without an intervening
    /// write, a repeated read observes the same version, so the overwrite
    /// is idempotent.
    pub fn record_read(&mut self, key: Key, version: Version, value: Value) -> Result<()> {
        self.ensure_active()?;
        self.read_set.insert(key, ObservedRead { version, value });
        Ok(())
    }

    /// Buffer a write. Later writes to the same key win; a previously
    /// buffered delete of the key is cancelled.
    pub fn buffer_write(&mut self, key: Key, value: Value) -> Result<()> {
        self.ensure_active()?;
        self.delete_set.remove(&key);
        self.write_set.insert(key, value);
        Ok(())
    }

    /// Buffer a delete, cancelling any previously buffered write.
    pub fn buffer_delete(&mut self, key: Key) -> Result<()> {
        self.ensure_active()?;
        self.write_set.remove(&key);
        self.delete_set.insert(key);
        Ok(())
    }

    /// Flip to `Committed` and stamp the end time. Bookkeeping only — the
    /// manager applies the buffers.
    pub fn mark_committed(&mut self) {
        debug_assert!(self.is_active(), "terminal status is final");
        self.status = TransactionStatus::Committed;
        self.end_time = Some(Instant::now());
    }

    /// Flip to `Aborted` and stamp the end time. The buffers are simply
    /// never applied.
    pub fn mark_aborted(&mut self) {
        debug_assert!(self.is_active(), "terminal status is final");
        self.status = TransactionStatus::Aborted;
        self.end_time = Some(Instant::now());
    }

    /// Wall-clock time from begin to termination; `None` while active.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::TransactionClosed {
                txn_id: self.tx_id,
                status: self.status.as_str(),
            })
        }
    }
}
