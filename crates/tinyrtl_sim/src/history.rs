//! Per-wire value histories produced by a simulation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Recorded values of every simulated wire, one entry per cycle.
///
/// Traces are keyed by wire name and iterate in name order. Index `t` of a
/// trace is the value the wire had during cycle `t`, before that cycle's
/// commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    cycles: usize,
    traces: BTreeMap<String, Vec<i64>>,
}

impl History {
    /// Builds a history from `(name, values)` pairs that all span `cycles`.
    pub(crate) fn from_traces(
        cycles: usize,
        traces: impl IntoIterator<Item = (String, Vec<i64>)>,
    ) -> Self {
        Self {
            cycles,
            traces: traces.into_iter().collect(),
        }
    }

    /// Returns the number of cycles recorded.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Returns the trace for `name`, if that wire was simulated.
    pub fn get(&self, name: &str) -> Option<&[i64]> {
        self.traces.get(name).map(Vec::as_slice)
    }

    /// Returns the number of wires with a trace.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Returns `true` if no wire was simulated.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Iterates over `(name, values)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.traces.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterates over the simulated wire names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.traces.keys().map(String::as_str)
    }

    /// Keeps only the traces whose name satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.traces.retain(|name, _| keep(name));
    }
}
