//! Dependency closure discovery.
//!
//! Starting from the wires a caller wants to observe, [`dependency_closure`]
//! follows every wire reference in each visited wire's combinational and
//! next-cycle expressions until no new wire turns up. The result is the full
//! set of wires the kernel has to evaluate and record each cycle.

use std::collections::{HashSet, VecDeque};

use tinyrtl_ir::{Circuit, ExprNode, WireId};

use crate::error::SimError;

/// Computes the transitive set of wires reachable from `targets`.
///
/// Each wire's expressions are walked at most once, and an expression node
/// shared by several parents (or several wires) is walked at most once per
/// call. The returned wires are sorted by handle, which gives a stable
/// iteration order; evaluation order within a cycle does not affect results.
///
/// Returns [`SimError::UnknownWire`] if a target, or any wire referenced along
/// the way, does not belong to `circuit`.
pub fn dependency_closure(circuit: &Circuit, targets: &[WireId]) -> Result<Vec<WireId>, SimError> {
    let mut found: HashSet<WireId> = HashSet::new();
    let mut pending: VecDeque<WireId> = VecDeque::new();
    for &id in targets {
        if found.insert(id) {
            pending.push_back(id);
        }
    }

    let mut seen_nodes: HashSet<*const ExprNode> = HashSet::new();
    while let Some(id) = pending.pop_front() {
        let wire = circuit.get(id).ok_or(SimError::UnknownWire(id))?;
        for expr in wire.exprs() {
            expr.walk_wires(&mut seen_nodes, |dep| {
                if found.insert(dep) {
                    pending.push_back(dep);
                }
            });
        }
    }

    let mut wires: Vec<WireId> = found.into_iter().collect();
    wires.sort_unstable();
    Ok(wires)
}
