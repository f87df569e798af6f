//! Cycle-stepped RTL simulator for tinyrtl circuits.
//!
//! This crate evaluates the wires of a [`Circuit`](tinyrtl_ir::Circuit) one
//! clock cycle at a time. Combinational wires are recomputed (and memoized)
//! every cycle; registered wires evaluate their next-cycle expression against
//! the pre-cycle state and all commit together at the cycle boundary.
//!
//! # Usage
//!
//! ```
//! use tinyrtl_ir::{Circuit, Expr};
//! use tinyrtl_sim::Simulate;
//!
//! let mut circuit = Circuit::new();
//! let a = circuit.add_wire("a", 1);
//! let b = circuit.add_wire("b", 2);
//! let sum = circuit.add_wire("sum", 0);
//! let acc = circuit.add_wire("acc", 0);
//! circuit.set_comb(sum, Expr::wire(a) + b);
//! circuit.set_next(acc, Expr::wire(acc) + sum);
//!
//! let history = circuit.simulate(&[sum, acc], 6, true).unwrap();
//! assert_eq!(history.get("acc"), Some(&[0, 3, 6, 9, 12, 15][..]));
//! ```
//!
//! # Modules
//!
//! - `error`: Simulation setup errors
//! - `evaluator`: Expression evaluation with per-cycle memoization
//! - `closure`: Dependency closure of observed wires
//! - `kernel`: Cycle loop with staged commit
//! - `history`: Recorded per-wire traces

#![warn(missing_docs)]

pub mod closure;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod kernel;

use tinyrtl_ir::{Circuit, WireId};

pub use closure::dependency_closure;
pub use error::SimError;
pub use evaluator::{eval_expr, is_truthy, EvalContext};
pub use history::History;
pub use kernel::SimKernel;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Wires whose histories the caller wants. Their dependency closure is
    /// simulated and recorded as well.
    pub targets: Vec<WireId>,
    /// Number of cycles to simulate.
    pub cycles: usize,
    /// Whether to restore the closure's committed values after the run.
    pub restore_state: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            cycles: 0,
            restore_state: true,
        }
    }
}

/// High-level entry point: simulates `config.cycles` cycles of `circuit`.
///
/// The returned history holds one trace per wire of the dependency closure
/// of `config.targets`, each `config.cycles` entries long. Unless
/// `config.restore_state` is `false`, the circuit's committed values are
/// left as they were before the call.
///
/// The combinational dependency graph must be acyclic; a combinational
/// wire that reads itself, directly or transitively, does not terminate.
pub fn simulate(circuit: &mut Circuit, config: &SimConfig) -> Result<History, SimError> {
    let mut kernel = SimKernel::new(circuit, &config.targets, config.restore_state)?;
    kernel.run(config.cycles);
    Ok(kernel.finish())
}

/// Simulation methods on [`Circuit`].
pub trait Simulate {
    /// Simulates `cycles` cycles observing `targets`.
    ///
    /// Equivalent to [`simulate`] with the matching [`SimConfig`].
    fn simulate(
        &mut self,
        targets: &[WireId],
        cycles: usize,
        restore_state: bool,
    ) -> Result<History, SimError>;

    /// Single-wire form of [`Simulate::simulate`].
    fn simulate_one(
        &mut self,
        target: WireId,
        cycles: usize,
        restore_state: bool,
    ) -> Result<History, SimError> {
        self.simulate(&[target], cycles, restore_state)
    }
}

impl Simulate for Circuit {
    fn simulate(
        &mut self,
        targets: &[WireId],
        cycles: usize,
        restore_state: bool,
    ) -> Result<History, SimError> {
        let config = SimConfig {
            targets: targets.to_vec(),
            cycles,
            restore_state,
        };
        simulate(self, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyrtl_ir::Expr;

    #[test]
    fn sim_config_default_restores() {
        let config = SimConfig::default();
        assert!(config.targets.is_empty());
        assert_eq!(config.cycles, 0);
        assert!(config.restore_state);
    }

    #[test]
    fn simulate_returns_whole_closure() {
        let mut c = Circuit::new();
        let a = c.add_wire("a", 1);
        let b = c.add_wire("b", 2);
        let sum = c.add_wire("sum", 0);
        c.set_comb(sum, Expr::wire(a) + b);
        let config = SimConfig {
            targets: vec![sum],
            cycles: 2,
            ..SimConfig::default()
        };
        let h = simulate(&mut c, &config).unwrap();
        assert_eq!(h.names().collect::<Vec<_>>(), vec!["a", "b", "sum"]);
        assert_eq!(h.get("sum"), Some(&[3, 3][..]));
    }

    #[test]
    fn simulate_one_matches_collection_form() {
        let mut c = Circuit::new();
        let acc = c.add_wire("acc", 5);
        c.set_next(acc, Expr::wire(acc) - 1);
        let one = c.simulate_one(acc, 3, true).unwrap();
        let many = c.simulate(&[acc], 3, true).unwrap();
        assert_eq!(one, many);
        assert_eq!(one.get("acc"), Some(&[5, 4, 3][..]));
    }

    #[test]
    fn empty_targets_give_empty_history() {
        let mut c = Circuit::new();
        c.add_wire("a", 0);
        let h = c.simulate(&[], 4, true).unwrap();
        assert!(h.is_empty());
    }
}
