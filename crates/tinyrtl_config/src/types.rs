//! Configuration types deserialized from `circuit.toml`.
//!
//! A description has an optional `[sim]` table and a list of `[[wires]]`:
//!
//! ```toml
//! [sim]
//! cycles = 6
//! targets = ["acc"]
//!
//! [[wires]]
//! name = "a"
//! init = 1
//!
//! [[wires]]
//! name = "acc"
//! next = { add = ["acc", "a"] }
//! ```
//!
//! Expressions are written as an integer (a constant), a string (a wire
//! reference), or a single-key table naming an operator. Unary operators take
//! one operand, binary operators a two-element array, and `select` a
//! three-element array `[condition, then, else]`.

use serde::Deserialize;

/// The top-level circuit description parsed from `circuit.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitConfig {
    /// Simulation settings.
    #[serde(default)]
    pub sim: SimSection,
    /// Wire declarations, in creation order.
    #[serde(default)]
    pub wires: Vec<WireDecl>,
}

/// The `[sim]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimSection {
    /// Number of cycles to simulate. Negative values mean zero cycles.
    #[serde(default)]
    pub cycles: i64,
    /// Whether committed values are restored after the run.
    #[serde(default = "default_restore_state")]
    pub restore_state: bool,
    /// Names of the wires to observe. Empty means every declared wire.
    #[serde(default)]
    pub targets: Vec<String>,
}

fn default_restore_state() -> bool {
    true
}

impl Default for SimSection {
    fn default() -> Self {
        Self {
            cycles: 0,
            restore_state: default_restore_state(),
            targets: Vec::new(),
        }
    }
}

impl SimSection {
    /// Returns the cycle count with negative values clamped to zero.
    pub fn cycle_count(&self) -> usize {
        usize::try_from(self.cycles).unwrap_or(0)
    }
}

/// A single `[[wires]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireDecl {
    /// The wire name; must be unique within the description.
    pub name: String,
    /// Initial committed value.
    #[serde(default)]
    pub init: i64,
    /// Combinational definition.
    #[serde(default)]
    pub comb: Option<ExprSpec>,
    /// Next-cycle definition.
    #[serde(default)]
    pub next: Option<ExprSpec>,
}

impl WireDecl {
    /// Iterates over the expression slots that are set, `comb` first.
    pub fn exprs(&self) -> impl Iterator<Item = &ExprSpec> {
        self.comb.iter().chain(self.next.iter())
    }
}

/// An expression as written in a description file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExprSpec {
    /// An integer literal.
    Const(i64),
    /// A reference to a wire by name.
    Wire(String),
    /// An operator applied to operands.
    Op(OpSpec),
}

/// An operator table such as `{ add = ["a", 1] }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpSpec {
    /// Arithmetic negation.
    Neg(Box<ExprSpec>),
    /// Bitwise NOT.
    Not(Box<ExprSpec>),
    /// Logical NOT.
    LogicNot(Box<ExprSpec>),
    /// Addition.
    Add(Box<(ExprSpec, ExprSpec)>),
    /// Subtraction.
    Sub(Box<(ExprSpec, ExprSpec)>),
    /// Multiplication.
    Mul(Box<(ExprSpec, ExprSpec)>),
    /// Division.
    Div(Box<(ExprSpec, ExprSpec)>),
    /// Remainder.
    Mod(Box<(ExprSpec, ExprSpec)>),
    /// Bitwise AND.
    And(Box<(ExprSpec, ExprSpec)>),
    /// Bitwise OR.
    Or(Box<(ExprSpec, ExprSpec)>),
    /// Bitwise XOR.
    Xor(Box<(ExprSpec, ExprSpec)>),
    /// Left shift.
    Shl(Box<(ExprSpec, ExprSpec)>),
    /// Arithmetic right shift.
    Shr(Box<(ExprSpec, ExprSpec)>),
    /// Equality.
    Eq(Box<(ExprSpec, ExprSpec)>),
    /// Inequality.
    Ne(Box<(ExprSpec, ExprSpec)>),
    /// Less than.
    Lt(Box<(ExprSpec, ExprSpec)>),
    /// Less than or equal.
    Le(Box<(ExprSpec, ExprSpec)>),
    /// Greater than.
    Gt(Box<(ExprSpec, ExprSpec)>),
    /// Greater than or equal.
    Ge(Box<(ExprSpec, ExprSpec)>),
    /// Logical AND.
    LogicAnd(Box<(ExprSpec, ExprSpec)>),
    /// Logical OR.
    LogicOr(Box<(ExprSpec, ExprSpec)>),
    /// Conditional select: `[condition, then, else]`.
    Select(Box<(ExprSpec, ExprSpec, ExprSpec)>),
}

impl ExprSpec {
    /// Calls `f` with every wire name referenced by this expression.
    pub fn for_each_wire<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            ExprSpec::Const(_) => {}
            ExprSpec::Wire(name) => f(name),
            ExprSpec::Op(op) => {
                for operand in op.operands() {
                    operand.for_each_wire(f);
                }
            }
        }
    }
}

impl OpSpec {
    /// Returns the operands in left-to-right order.
    pub fn operands(&self) -> Vec<&ExprSpec> {
        match self {
            OpSpec::Neg(x) | OpSpec::Not(x) | OpSpec::LogicNot(x) => vec![x.as_ref()],
            OpSpec::Add(p)
            | OpSpec::Sub(p)
            | OpSpec::Mul(p)
            | OpSpec::Div(p)
            | OpSpec::Mod(p)
            | OpSpec::And(p)
            | OpSpec::Or(p)
            | OpSpec::Xor(p)
            | OpSpec::Shl(p)
            | OpSpec::Shr(p)
            | OpSpec::Eq(p)
            | OpSpec::Ne(p)
            | OpSpec::Lt(p)
            | OpSpec::Le(p)
            | OpSpec::Gt(p)
            | OpSpec::Ge(p)
            | OpSpec::LogicAnd(p)
            | OpSpec::LogicOr(p) => vec![&p.0, &p.1],
            OpSpec::Select(t) => vec![&t.0, &t.1, &t.2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_section_defaults() {
        let sim = SimSection::default();
        assert_eq!(sim.cycles, 0);
        assert!(sim.restore_state);
        assert!(sim.targets.is_empty());
    }

    #[test]
    fn negative_cycles_clamp_to_zero() {
        let sim = SimSection {
            cycles: -3,
            ..SimSection::default()
        };
        assert_eq!(sim.cycle_count(), 0);
        let sim = SimSection {
            cycles: 7,
            ..SimSection::default()
        };
        assert_eq!(sim.cycle_count(), 7);
    }

    #[test]
    fn expr_forms() {
        let decl: WireDecl = toml::from_str(
            r#"
name = "m"
comb = { select = [{ gt = ["a", "b"] }, "a", -1] }
"#,
        )
        .unwrap();
        let Some(ExprSpec::Op(OpSpec::Select(parts))) = &decl.comb else {
            panic!("expected select");
        };
        assert_eq!(parts.1, ExprSpec::Wire("a".into()));
        assert_eq!(parts.2, ExprSpec::Const(-1));
        assert!(matches!(parts.0, ExprSpec::Op(OpSpec::Gt(_))));
    }

    #[test]
    fn unary_takes_single_operand() {
        let decl: WireDecl = toml::from_str(r#"name = "n"
next = { logic_not = "x" }"#)
        .unwrap();
        assert_eq!(
            decl.next,
            Some(ExprSpec::Op(OpSpec::LogicNot(Box::new(ExprSpec::Wire(
                "x".into()
            )))))
        );
    }

    #[test]
    fn binary_arity_is_checked() {
        let err = toml::from_str::<WireDecl>(r#"name = "n"
comb = { add = ["a"] }"#);
        assert!(err.is_err());
    }

    #[test]
    fn unknown_wire_keys_rejected() {
        let err = toml::from_str::<WireDecl>(r#"name = "n"
initial = 3"#);
        assert!(err.is_err());
    }

    #[test]
    fn for_each_wire_collects_names_in_order() {
        let decl: WireDecl = toml::from_str(
            r#"
name = "x"
comb = { add = [{ mul = ["p", 2] }, "q"] }
"#,
        )
        .unwrap();
        let mut names = Vec::new();
        decl.comb.as_ref().unwrap().for_each_wire(&mut |n| names.push(n));
        assert_eq!(names, vec!["p", "q"]);
    }
}
