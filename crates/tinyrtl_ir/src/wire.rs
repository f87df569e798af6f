//! Wires: named storage cells with optional combinational and next-cycle
//! definitions.

use tinyrtl_common::Ident;

use crate::expr::Expr;
use crate::ids::WireId;

/// A named storage cell.
///
/// A wire with neither expression is pure state and keeps its committed
/// value across cycles. A wire with only `comb` never changes its committed
/// value during simulation; reads of it evaluate `comb` instead. A wire with
/// `next` is a register: `next` is evaluated against the pre-cycle state and
/// committed at the cycle boundary. Both slots may be set at once.
#[derive(Debug, Clone)]
pub struct Wire {
    /// The handle of this wire within its circuit.
    pub id: WireId,
    /// The interned wire name, used as the history key.
    pub name: Ident,
    /// The value as of the last completed cycle boundary.
    pub committed: i64,
    /// Instantaneous definition, recomputed (memoized) every cycle.
    pub comb: Option<Expr>,
    /// Deferred definition, committed at the end of each cycle.
    pub next: Option<Expr>,
}

impl Wire {
    /// Returns `true` if the wire has a next-cycle definition.
    pub fn is_register(&self) -> bool {
        self.next.is_some()
    }

    /// Returns `true` if the wire has a combinational definition.
    pub fn is_combinational(&self) -> bool {
        self.comb.is_some()
    }

    /// Iterates over the wire's expression slots that are set, `comb` first.
    pub fn exprs(&self) -> impl Iterator<Item = &Expr> {
        self.comb.iter().chain(self.next.iter())
    }
}
