//! Identifier aliases shared across the store and transaction layers.

/// Key under which values are versioned.
///
/// Keys are opaque to the store; there is no structure or namespacing.
pub type Key = String;

/// Globally unique, monotonically increasing id of a single write.
///
/// Version ids are issued by the store's global counter. `0` is never
/// issued: a snapshot of `0` sees an empty store.
pub type Version = u64;

/// Manager-local transaction identifier.
pub type TxnId = u64;
