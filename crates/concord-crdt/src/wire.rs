//! Serializable counter states.
//!
//! States carry the sender's identity alongside its counts so a receiver can
//! attribute merges in logs. Encoding uses bincode; any serde format works on
//! the same types.

use concord_core::{ConcordError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::counts::ReplicaCounts;

/// Wire form of a [`GCounter`](crate::GCounter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GCounterState {
    /// Replica that produced this state.
    pub node_id: String,
    /// Per-replica counts.
    pub counts: ReplicaCounts,
}

/// Wire form of a [`PNCounter`](crate::PNCounter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PNCounterState {
    /// Replica that produced this state.
    pub node_id: String,
    /// Per-replica increments.
    pub positive: ReplicaCounts,
    /// Per-replica decrements.
    pub negative: ReplicaCounts,
}

impl GCounterState {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }
}

impl PNCounterState {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| ConcordError::serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| ConcordError::serialization(e.to_string()))
}
