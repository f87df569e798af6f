//! The wire registry.
//!
//! A [`Circuit`] owns every [`Wire`] in an arena and the interner for their
//! names. Expressions reference wires by [`WireId`], so no expression can
//! outlive the wires it reads: both live as long as the circuit.

use tinyrtl_common::Interner;

use crate::arena::Arena;
use crate::expr::Expr;
use crate::ids::WireId;
use crate::wire::Wire;

/// A collection of wires and their definitions.
///
/// Committed values change only through [`Circuit::set_value`] (an explicit
/// instantaneous assignment between runs) and [`Circuit::commit`], which the
/// simulator calls at each cycle boundary. Both take `&mut self`, so neither
/// can race with an in-progress evaluation.
#[derive(Debug, Default)]
pub struct Circuit {
    wires: Arena<WireId, Wire>,
    names: Interner,
}

impl Circuit {
    /// Creates an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wire named `name` with committed value `init`.
    ///
    /// Names are not required to be unique, but wires that take part in the
    /// same simulation must have distinct names.
    pub fn add_wire(&mut self, name: &str, init: i64) -> WireId {
        let name = self.names.get_or_intern(name);
        self.wires.alloc_with(|id| Wire {
            id,
            name,
            committed: init,
            comb: None,
            next: None,
        })
    }

    /// Creates a wire named `name` with committed value `0`.
    pub fn wire(&mut self, name: &str) -> WireId {
        self.add_wire(name, 0)
    }

    /// Sets (or replaces) the combinational definition of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this circuit.
    pub fn set_comb(&mut self, id: WireId, expr: impl Into<Expr>) {
        self.wires[id].comb = Some(expr.into());
    }

    /// Sets (or replaces) the next-cycle definition of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this circuit.
    pub fn set_next(&mut self, id: WireId, expr: impl Into<Expr>) {
        self.wires[id].next = Some(expr.into());
    }

    /// Overwrites the committed value of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this circuit.
    pub fn set_value(&mut self, id: WireId, value: i64) {
        self.wires[id].committed = value;
    }

    /// Applies staged next-cycle values as one cycle-boundary commit.
    ///
    /// # Panics
    ///
    /// Panics if any id does not belong to this circuit.
    pub fn commit(&mut self, staged: &[(WireId, i64)]) {
        for &(id, value) in staged {
            self.wires[id].committed = value;
        }
    }

    /// Returns the wire with the given handle, if it belongs to this circuit.
    pub fn get(&self, id: WireId) -> Option<&Wire> {
        self.wires.try_get(id)
    }

    /// Returns `true` if `id` belongs to this circuit.
    pub fn contains(&self, id: WireId) -> bool {
        self.wires.contains(id)
    }

    /// Returns the first wire (in creation order) named `name`.
    pub fn wire_by_name(&self, name: &str) -> Option<WireId> {
        let ident = self.names.get(name)?;
        self.wires
            .iter()
            .find(|(_, w)| w.name == ident)
            .map(|(id, _)| id)
    }

    /// Returns the name of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this circuit.
    pub fn name_of(&self, id: WireId) -> &str {
        self.names.resolve(self.wires[id].name)
    }

    /// Returns the committed value of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this circuit.
    pub fn value_of(&self, id: WireId) -> i64 {
        self.wires[id].committed
    }

    /// Returns the number of wires.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Returns `true` if the circuit has no wires.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Iterates over all wires in creation order.
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.iter().map(|(_, w)| w)
    }

    /// Renders `expr` in infix form using this circuit's wire names.
    ///
    /// Handles that do not belong to the circuit are shown as `$<index>`.
    pub fn render_expr(&self, expr: &Expr) -> String {
        let mut out = String::new();
        let name = |id: WireId| match self.get(id) {
            Some(w) => self.names.resolve(w.name).to_string(),
            None => id.to_string(),
        };
        // Writing into a `String` cannot fail.
        let _ = expr.render(&mut out, &name);
        out
    }
}
