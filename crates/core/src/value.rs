//! Value types and the versioned record the store keeps per write.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::Version;

/// Opaque payload stored under a key.
///
/// The store never interprets a value; it only relies on equality and cheap
/// cloning. The variants cover the payloads typical callers use — anything
/// richer can be carried as `Bytes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    I64(i64),
    /// 64-bit floating point
    F64(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Value {
    /// Return the integer payload, if this is an `I64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(n) => Some(*n),
            _ => None,
        }
    }

    /// Return the float payload, if this is an `F64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Return the string payload, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Return the boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::I64(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::F64(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

/// A single immutable version of a value.
///
/// Every write produces one of these: the payload, the version id drawn
/// from the store's global counter, and the wall-clock creation time.
/// The timestamp is retained for observability only; correctness logic
/// never consults it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedValue {
    /// The stored payload
    pub value: Value,
    /// Monotonically increasing version id
    pub version: Version,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl VersionedValue {
    /// Create a versioned value stamped with the current wall-clock time.
    pub fn new(value: Value, version: Version) -> Self {
        VersionedValue {
            value,
            version,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Create a versioned value with an explicit timestamp.
    pub fn with_timestamp(value: Value, version: Version, timestamp: i64) -> Self {
        VersionedValue {
            value,
            version,
            timestamp,
        }
    }
}
