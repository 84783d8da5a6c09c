//! Storage layer for LatticeDB
//!
//! This crate implements the multi-version value store:
//! - VersionChain: per-key append-only list of versions
//! - VersionStore: key → chain mapping plus the global version counter
//!
//! The store owns every version ever written until a GC pass reclaims it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod store;

pub use chain::{StoredVersion, VersionChain};
pub use store::VersionStore;
