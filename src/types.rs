//! Shared identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock time in seconds, as delivered by the instrumentation backend.
pub type Timestamp = f64;

/// Header name/value pairs. Ordered so snapshots compare and print stably.
pub type Headers = std::collections::BTreeMap<String, String>;

/// Opaque per-request token assigned by the backend, unique while in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub u64);

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier(value)
    }
}

/// Handle to a resource record owned by the store arena.
///
/// Handles are never reused, so a stale handle simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Backend frame identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct FrameId(pub String);

impl FrameId {
    pub fn new(id: impl Into<String>) -> Self {
        FrameId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameId {
    fn from(value: &str) -> Self {
        FrameId(value.to_string())
    }
}

/// Identifies one navigation; groups resources loaded by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct LoaderId(pub String);

impl LoaderId {
    pub fn new(id: impl Into<String>) -> Self {
        LoaderId(id.into())
    }
}

impl fmt::Display for LoaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LoaderId {
    fn from(value: &str) -> Self {
        LoaderId(value.to_string())
    }
}

impl From<RawId> for FrameId {
    fn from(raw: RawId) -> Self {
        FrameId(raw.into_string())
    }
}

impl From<FrameId> for String {
    fn from(id: FrameId) -> Self {
        id.0
    }
}

impl From<RawId> for LoaderId {
    fn from(raw: RawId) -> Self {
        LoaderId(raw.into_string())
    }
}

impl From<LoaderId> for String {
    fn from(id: LoaderId) -> Self {
        id.0
    }
}

/// Backends have sent frame and loader ids both as strings and as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
#[doc(hidden)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}
