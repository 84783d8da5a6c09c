//! Transaction layer for LatticeDB
//!
//! This crate implements snapshot-isolated transactions with optimistic
//! concurrency control:
//! - Transaction: per-transaction working state (read set, write buffer)
//! - validation: first-committer-wins conflict detection at commit time
//! - TransactionManager: begin/read/write/commit/abort/gc coordination
//! - Statistics: commit/abort counters and latency summaries
//!
//! Transactions proceed without locks against a snapshot fixed at begin and
//! are validated when they commit; a conflicting commit aborts and the
//! caller retries from a fresh snapshot. Write skew is permitted — the
//! layer provides snapshot isolation, not serializability.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod stats;
pub mod transaction;
pub mod validation;

pub use manager::{CommitError, ManagerConfig, TransactionManager};
pub use stats::{LatencySummary, TxnStats};
pub use transaction::{ObservedRead, Transaction, TransactionStatus};
pub use validation::{validate_read_set, Conflict, ValidationResult};
