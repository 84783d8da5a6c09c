//! Core types for LatticeDB
//!
//! This crate defines the foundational types shared by the storage and
//! transaction layers:
//! - Key / Version / TxnId: identifier aliases
//! - Value: opaque payload enum
//! - VersionedValue: a value paired with its version id and creation time
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use types::{Key, TxnId, Version};
pub use value::{Value, VersionedValue};
