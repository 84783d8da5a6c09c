//! # LatticeDB
//!
//! An in-memory multi-version key–value store with snapshot-isolated
//! optimistic transactions.
//!
//! Every write appends a fresh version instead of overwriting in place, so
//! readers see a consistent snapshot without blocking writers. Transactions
//! buffer their writes, validate their reads at commit time
//! (first-committer-wins), and either apply atomically or abort with no
//! visible effect. Obsolete versions are reclaimed by an explicit GC pass
//! that respects every live snapshot.
//!
//! # Quick Start
//!
//! ```
//! use latticedb::{TransactionManager, Value, VersionStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(VersionStore::new());
//! let manager = TransactionManager::new(Arc::clone(&store));
//!
//! store.write("price", 100_i64);
//!
//! let txn = manager.begin()?;
//! assert_eq!(manager.read(txn, "price")?, Some(Value::I64(100)));
//! manager.write(txn, "price", 120_i64)?;
//! manager.commit(txn).expect("no concurrent writers");
//!
//! assert_eq!(
//!     store.read("price", store.current_version()),
//!     Some(Value::I64(120)),
//! );
//! # Ok::<(), latticedb::Error>(())
//! ```
//!
//! # Architecture
//!
//! | Layer | Crate | Responsibility |
//! |-------|-------|----------------|
//! | [`VersionStore`] | `lattice-storage` | per-key version chains, global version counter, snapshot reads, GC |
//! | [`Transaction`] | `lattice-txn` | snapshot version, read set, buffered writes/deletes |
//! | [`TransactionManager`] | `lattice-txn` | begin/read/write/commit/abort, validation, statistics, GC watermark |
//!
//! The store is purely in-memory: contents are lost on process exit. The
//! isolation level is snapshot isolation — write skew is possible, as with
//! any non-serializable MVCC system.

pub use lattice_core::{Error, Key, Result, TxnId, Value, Version, VersionedValue};
pub use lattice_storage::{StoredVersion, VersionChain, VersionStore};
pub use lattice_txn::{
    validate_read_set, CommitError, Conflict, LatencySummary, ManagerConfig, ObservedRead,
    Transaction, TransactionManager, TransactionStatus, TxnStats, ValidationResult,
};
