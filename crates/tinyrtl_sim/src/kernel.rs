//! Cycle-stepped simulation kernel.
//!
//! [`SimKernel`] drives a [`Circuit`] one clock cycle at a time. Each cycle:
//!
//! 1. starts a fresh memo table,
//! 2. records the current value of every wire in the dependency closure,
//! 3. evaluates every next-cycle expression against the same snapshot and
//!    stages the result,
//! 4. commits all staged values at once.
//!
//! Because commit happens only after every next value is computed, all
//! registers update as if on the same clock edge: no register observes
//! another register's value from the cycle being computed.

use std::collections::HashMap;

use tinyrtl_ir::{Circuit, WireId};
use tracing::{debug, trace};

use crate::closure::dependency_closure;
use crate::error::SimError;
use crate::evaluator::{eval_expr, EvalContext};
use crate::history::History;

/// The simulation kernel: dependency closure, recorded traces, and the
/// circuit whose committed state it advances.
///
/// The kernel holds the circuit mutably for its whole lifetime, so nothing
/// else can change committed values while a run is in progress. When
/// created with `restore_state`, the closure's committed values are
/// snapshotted up front and written back when the kernel is finished or
/// dropped.
pub struct SimKernel<'c> {
    circuit: &'c mut Circuit,
    /// Dependency closure, sorted by handle.
    wires: Vec<WireId>,
    /// One trace per entry of `wires`.
    traces: Vec<Vec<i64>>,
    /// Number of completed cycles.
    cycle: u64,
    /// Committed values to write back on finish, if restoring.
    saved: Option<Vec<(WireId, i64)>>,
}

impl<'c> SimKernel<'c> {
    /// Creates a kernel observing `targets`.
    ///
    /// Computes the dependency closure of `targets` and checks that no two
    /// closure wires share a name.
    pub fn new(
        circuit: &'c mut Circuit,
        targets: &[WireId],
        restore_state: bool,
    ) -> Result<Self, SimError> {
        let wires = dependency_closure(circuit, targets)?;
        check_unique_names(circuit, &wires)?;

        let saved = restore_state.then(|| {
            wires
                .iter()
                .map(|&id| (id, circuit.value_of(id)))
                .collect::<Vec<_>>()
        });

        debug!(
            targets = targets.len(),
            closure = wires.len(),
            restore_state,
            "simulation kernel created"
        );

        Ok(Self {
            circuit,
            traces: vec![Vec::new(); wires.len()],
            wires,
            cycle: 0,
            saved,
        })
    }

    /// Returns the dependency closure being simulated, sorted by handle.
    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }

    /// Returns the number of cycles completed so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns the circuit being simulated, with committed values as of the
    /// last completed cycle.
    pub fn circuit(&self) -> &Circuit {
        &*self.circuit
    }

    /// Simulates one cycle and returns its index.
    pub fn step(&mut self) -> u64 {
        let circuit: &Circuit = &*self.circuit;
        let mut ctx = EvalContext::new(circuit);

        for (trace, &id) in self.traces.iter_mut().zip(&self.wires) {
            trace.push(ctx.wire_value(id));
        }

        let mut staged: Vec<(WireId, i64)> = Vec::new();
        for &id in &self.wires {
            if let Some(next) = circuit.get(id).and_then(|w| w.next.as_ref()) {
                staged.push((id, eval_expr(&mut ctx, next)));
            }
        }

        self.circuit.commit(&staged);

        let cycle = self.cycle;
        trace!(cycle, committed = staged.len(), "cycle committed");
        self.cycle += 1;
        cycle
    }

    /// Simulates `cycles` consecutive cycles.
    pub fn run(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// Returns the history recorded so far.
    pub fn history(&self) -> History {
        History::from_traces(
            self.cycle as usize,
            self.wires
                .iter()
                .zip(&self.traces)
                .map(|(&id, trace)| (self.circuit.name_of(id).to_string(), trace.clone())),
        )
    }

    /// Ends the run, restoring committed state if requested, and returns the
    /// recorded history.
    pub fn finish(mut self) -> History {
        let history = self.history();
        self.restore();
        debug!(cycles = self.cycle, wires = self.wires.len(), "simulation finished");
        history
    }

    fn restore(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.circuit.commit(&saved);
        }
    }
}

/// Rejects closures in which two distinct wires share a name, since their
/// traces would land under the same history key.
fn check_unique_names(circuit: &Circuit, wires: &[WireId]) -> Result<(), SimError> {
    let mut names: HashMap<&str, WireId> = HashMap::with_capacity(wires.len());
    for &id in wires {
        let name = circuit.name_of(id);
        if names.insert(name, id).is_some() {
            return Err(SimError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}

impl Drop for SimKernel<'_> {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyrtl_ir::Expr;

    /// a = 1, b = 2, sum = a + b, acc <= acc + sum.
    fn accumulator() -> (Circuit, WireId, WireId) {
        let mut c = Circuit::new();
        let a = c.add_wire("a", 1);
        let b = c.add_wire("b", 2);
        let sum = c.add_wire("sum", 0);
        let acc = c.add_wire("acc", 0);
        c.set_comb(sum, Expr::wire(a) + b);
        c.set_next(acc, Expr::wire(acc) + sum);
        (c, sum, acc)
    }

    #[test]
    fn records_pre_commit_values() {
        let (mut c, _, acc) = accumulator();
        let mut kernel = SimKernel::new(&mut c, &[acc], true).unwrap();
        kernel.run(6);
        let history = kernel.finish();
        assert_eq!(history.get("acc"), Some(&[0, 3, 6, 9, 12, 15][..]));
        assert_eq!(history.get("sum"), Some(&[3, 3, 3, 3, 3, 3][..]));
    }

    #[test]
    fn step_returns_cycle_index() {
        let (mut c, _, acc) = accumulator();
        let mut kernel = SimKernel::new(&mut c, &[acc], true).unwrap();
        assert_eq!(kernel.step(), 0);
        assert_eq!(kernel.step(), 1);
        assert_eq!(kernel.cycle(), 2);
        assert_eq!(kernel.circuit().value_of(acc), 6);
    }

    #[test]
    fn registers_swap_on_the_same_edge() {
        let mut c = Circuit::new();
        let x = c.add_wire("x", 1);
        let y = c.add_wire("y", 2);
        c.set_next(x, y);
        c.set_next(y, x);
        let mut kernel = SimKernel::new(&mut c, &[x, y], true).unwrap();
        kernel.run(4);
        let h = kernel.finish();
        assert_eq!(h.get("x"), Some(&[1, 2, 1, 2][..]));
        assert_eq!(h.get("y"), Some(&[2, 1, 2, 1][..]));
    }

    #[test]
    fn next_sees_same_comb_snapshot_as_recording() {
        // d is combinational over the register q; q <= d. Both the recorded
        // d and the value committed into q come from the pre-edge q.
        let mut c = Circuit::new();
        let q = c.add_wire("q", 1);
        let d = c.add_wire("d", 0);
        c.set_comb(d, Expr::wire(q) * 2);
        c.set_next(q, d);
        let mut kernel = SimKernel::new(&mut c, &[q], false).unwrap();
        kernel.run(4);
        let h = kernel.finish();
        assert_eq!(h.get("q"), Some(&[1, 2, 4, 8][..]));
        assert_eq!(h.get("d"), Some(&[2, 4, 8, 16][..]));
        assert_eq!(c.value_of(q), 16);
    }

    #[test]
    fn restore_on_finish() {
        let (mut c, _, acc) = accumulator();
        let mut kernel = SimKernel::new(&mut c, &[acc], true).unwrap();
        kernel.run(3);
        kernel.finish();
        assert_eq!(c.value_of(acc), 0);
    }

    #[test]
    fn restore_on_drop() {
        let (mut c, _, acc) = accumulator();
        {
            let mut kernel = SimKernel::new(&mut c, &[acc], true).unwrap();
            kernel.run(3);
        }
        assert_eq!(c.value_of(acc), 0);
    }

    #[test]
    fn no_restore_keeps_advanced_state() {
        let (mut c, _, acc) = accumulator();
        let mut kernel = SimKernel::new(&mut c, &[acc], false).unwrap();
        kernel.run(3);
        kernel.finish();
        assert_eq!(c.value_of(acc), 9);
    }

    #[test]
    fn comb_only_wire_never_commits() {
        let mut c = Circuit::new();
        let w = c.add_wire("w", 10);
        c.set_comb(w, 5);
        let mut kernel = SimKernel::new(&mut c, &[w], false).unwrap();
        kernel.run(2);
        let h = kernel.finish();
        assert_eq!(h.get("w"), Some(&[5, 5][..]));
        assert_eq!(c.value_of(w), 10);
    }

    #[test]
    fn comb_and_next_on_one_wire() {
        // r reads as comb every cycle while its committed value advances
        // through next, which nothing observes until comb is removed.
        let mut c = Circuit::new();
        let k = c.add_wire("k", 3);
        let r = c.wire("r");
        let reader = c.wire("reader");
        c.set_comb(r, Expr::wire(k) * 10);
        c.set_next(r, Expr::wire(k) + 1);
        c.set_comb(reader, Expr::wire(r) + 1);
        let mut kernel = SimKernel::new(&mut c, &[r, reader], false).unwrap();
        kernel.run(3);
        let h = kernel.finish();
        assert_eq!(h.get("r"), Some(&[30, 30, 30][..]));
        assert_eq!(h.get("reader"), Some(&[31, 31, 31][..]));
        assert_eq!(c.value_of(r), 4);
    }

    #[test]
    fn zero_cycles_yield_empty_traces() {
        let (mut c, sum, _) = accumulator();
        let kernel = SimKernel::new(&mut c, &[sum], true).unwrap();
        let h = kernel.finish();
        assert_eq!(h.cycles(), 0);
        assert_eq!(h.get("sum"), Some(&[][..]));
    }

    #[test]
    fn duplicate_names_in_closure_are_rejected() {
        let mut c = Circuit::new();
        let first = c.add_wire("dup", 1);
        let second = c.add_wire("dup", 2);
        let err = SimKernel::new(&mut c, &[first, second], true)
            .err()
            .unwrap();
        assert!(matches!(err, SimError::DuplicateName(ref n) if n == "dup"));
    }

    #[test]
    fn duplicate_names_outside_closure_are_fine() {
        let mut c = Circuit::new();
        let first = c.add_wire("dup", 1);
        let _second = c.add_wire("dup", 2);
        assert!(SimKernel::new(&mut c, &[first], true).is_ok());
    }
}
