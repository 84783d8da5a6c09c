//! Error types for LatticeDB
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations. Commit conflicts are deliberately *not* part of this
//! enum: a conflict is a normal outcome of optimistic concurrency and is
//! surfaced by the transaction layer's own commit error type.

use crate::types::TxnId;
use thiserror::Error;

/// Result type alias for LatticeDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Usage errors surfaced by the transaction manager and transaction handles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Operation named a transaction id that is not in the live set —
    /// never created, or already committed or aborted.
    #[error("unknown transaction {0}")]
    UnknownTransaction(TxnId),

    /// A transaction handle was driven after reaching a terminal state.
    #[error("transaction {txn_id} already {status}")]
    TransactionClosed {
        /// Id of the offending transaction
        txn_id: TxnId,
        /// Terminal status it reached ("committed" or "aborted")
        status: &'static str,
    },

    /// The configured live-transaction limit was reached at begin.
    #[error("live transaction limit reached ({0})")]
    TransactionLimit(usize),
}

impl Error {
    /// Check whether this error names a transaction outside the live set.
    pub fn is_unknown_transaction(&self) -> bool {
        matches!(self, Error::UnknownTransaction(_))
    }
}
