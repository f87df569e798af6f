//! Conformance test helpers for the tinyrtl simulator.
//!
//! Provides reference circuits built through the construction API and a
//! helper that runs a `circuit.toml` description end to end (load, validate,
//! build, simulate), so integration tests can compare both front ends.

#![warn(missing_docs)]

use std::error::Error;

use tinyrtl_config::BuiltCircuit;
use tinyrtl_ir::{Circuit, Expr, WireId};
use tinyrtl_sim::{simulate, History};

/// The running accumulator: `sum = a + b` and `acc <= acc + sum`.
pub struct Accumulator {
    /// The circuit holding all four wires.
    pub circuit: Circuit,
    /// Constant input, initialized to 1.
    pub a: WireId,
    /// Constant input, initialized to 2.
    pub b: WireId,
    /// Combinational `a + b`.
    pub sum: WireId,
    /// Register accumulating `sum`, initialized to 0.
    pub acc: WireId,
}

/// Builds the [`Accumulator`] reference circuit.
pub fn accumulator() -> Accumulator {
    let mut circuit = Circuit::new();
    let a = circuit.add_wire("a", 1);
    let b = circuit.add_wire("b", 2);
    let sum = circuit.wire("sum");
    let acc = circuit.wire("acc");
    circuit.set_comb(sum, Expr::wire(a) + b);
    circuit.set_next(acc, Expr::wire(acc) + sum);
    Accumulator {
        circuit,
        a,
        b,
        sum,
        acc,
    }
}

/// Builds `m = a > b ? a : b` and returns `(circuit, a, b, m)`.
pub fn max_circuit(a_init: i64, b_init: i64) -> (Circuit, WireId, WireId, WireId) {
    let mut circuit = Circuit::new();
    let a = circuit.add_wire("a", a_init);
    let b = circuit.add_wire("b", b_init);
    let m = circuit.wire("m");
    circuit.set_comb(m, Expr::select(Expr::wire(a).gt(b), a, b));
    (circuit, a, b, m)
}

/// Loads, validates and builds a description given as TOML text.
pub fn build_description(toml: &str) -> Result<BuiltCircuit, Box<dyn Error>> {
    let config = tinyrtl_config::load_config_from_str(toml)?;
    Ok(tinyrtl_config::build_circuit(&config)?)
}

/// Builds a description and runs the simulation its `[sim]` table requests.
///
/// Returns the built circuit (with committed state as the run left it) and
/// the recorded history of the full dependency closure.
pub fn run_description(toml: &str) -> Result<(BuiltCircuit, History), Box<dyn Error>> {
    let mut built = build_description(toml)?;
    let history = simulate(&mut built.circuit, &built.sim)?;
    Ok((built, history))
}
