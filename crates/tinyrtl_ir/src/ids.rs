//! Opaque ID newtypes for IR entities.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

/// Opaque, copyable handle for a wire within a [`Circuit`](crate::Circuit).
///
/// Wire identity is the handle, never the name: two wires may share a name
/// and still be distinct, and expression nodes refer to wires only through
/// this handle.
///
/// A handle is an index and carries no record of the circuit that issued
/// it. Using it with a different circuit is a caller error: an index past
/// the end is reported by the simulator as an unknown wire, but an index in
/// range silently names whichever wire of that circuit sits at it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct WireId(u32);

impl WireId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl ArenaId for WireId {
    fn from_raw(index: u32) -> Self {
        Self(index)
    }

    fn as_raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for WireId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}
