//! Immutable, shared expression graphs.
//!
//! An [`Expr`] is a cheap, clonable handle to an [`ExprNode`]. Building an
//! expression never mutates an existing node, so a sub-expression can be
//! reused under any number of parents; the result is a DAG rather than a tree.
//! Nodes refer to wires only through [`WireId`] handles and never own them.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ids::WireId;

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation (`-`).
    Neg,
    /// Bitwise NOT (`~`).
    Not,
    /// Logical NOT (`!`), yields `0` or `1`.
    LogicNot,
}

impl UnaryOp {
    /// Returns the operator's infix symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "~",
            UnaryOp::LogicNot => "!",
        }
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`), zero divisor yields `0`.
    Div,
    /// Remainder (`%`), zero divisor yields `0`.
    Mod,
    /// Bitwise AND (`&`).
    And,
    /// Bitwise OR (`|`).
    Or,
    /// Bitwise XOR (`^`).
    Xor,
    /// Left shift (`<<`).
    Shl,
    /// Arithmetic right shift (`>>`).
    Shr,
    /// Equality (`==`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Logical AND (`&&`).
    LogicAnd,
    /// Logical OR (`||`).
    LogicOr,
}

impl BinaryOp {
    /// Returns the operator's infix symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::LogicAnd => "&&",
            BinaryOp::LogicOr => "||",
        }
    }
}

/// A single node of an expression graph.
#[derive(Debug)]
pub enum ExprNode {
    /// A signed 64-bit literal.
    Const(i64),
    /// A reference to a wire's current value.
    Wire(WireId),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Expr,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left-hand side.
        lhs: Expr,
        /// The right-hand side.
        rhs: Expr,
    },
    /// A conditional select (`cond ? then_val : else_val`).
    Select {
        /// The condition, coerced to a boolean.
        condition: Expr,
        /// The value when the condition is nonzero.
        then_val: Expr,
        /// The value when the condition is zero.
        else_val: Expr,
    },
}

/// A shared handle to an immutable [`ExprNode`].
///
/// Cloning an `Expr` clones the handle, not the graph.
#[derive(Debug, Clone)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    fn from_node(node: ExprNode) -> Self {
        Self(Arc::new(node))
    }

    /// Builds a constant node.
    pub fn constant(value: i64) -> Self {
        Self::from_node(ExprNode::Const(value))
    }

    /// Builds a wire-reference node.
    pub fn wire(id: WireId) -> Self {
        Self::from_node(ExprNode::Wire(id))
    }

    /// Builds a unary node over `operand`.
    pub fn unary(op: UnaryOp, operand: impl Into<Expr>) -> Self {
        Self::from_node(ExprNode::Unary {
            op,
            operand: operand.into(),
        })
    }

    /// Builds a binary node over `lhs` and `rhs`.
    pub fn binary(op: BinaryOp, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::from_node(ExprNode::Binary {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        })
    }

    /// Builds a select node: `then_val` when `condition` is nonzero, else `else_val`.
    pub fn select(
        condition: impl Into<Expr>,
        then_val: impl Into<Expr>,
        else_val: impl Into<Expr>,
    ) -> Self {
        Self::from_node(ExprNode::Select {
            condition: condition.into(),
            then_val: then_val.into(),
            else_val: else_val.into(),
        })
    }

    /// Returns the node this handle points to.
    pub fn node(&self) -> &ExprNode {
        &self.0
    }

    /// Returns `true` if both handles point to the same node.
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// `self == rhs`, yielding `0` or `1`.
    pub fn equals(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Eq, self.clone(), rhs)
    }

    /// `self != rhs`, yielding `0` or `1`.
    pub fn not_equals(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Ne, self.clone(), rhs)
    }

    /// `self < rhs`, yielding `0` or `1`.
    pub fn lt(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Lt, self.clone(), rhs)
    }

    /// `self <= rhs`, yielding `0` or `1`.
    pub fn le(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Le, self.clone(), rhs)
    }

    /// `self > rhs`, yielding `0` or `1`.
    pub fn gt(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Gt, self.clone(), rhs)
    }

    /// `self >= rhs`, yielding `0` or `1`.
    pub fn ge(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Ge, self.clone(), rhs)
    }

    /// Logical AND of the truthiness of both operands.
    pub fn logic_and(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::LogicAnd, self.clone(), rhs)
    }

    /// Logical OR of the truthiness of both operands.
    pub fn logic_or(&self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::LogicOr, self.clone(), rhs)
    }

    /// Logical negation: `1` if `self` is zero, else `0`.
    pub fn logic_not(&self) -> Expr {
        Expr::unary(UnaryOp::LogicNot, self.clone())
    }

    /// Calls `f` for every wire reference reachable from this expression.
    ///
    /// Nodes already present in `seen` are skipped, and every node walked is
    /// added to it, so a shared sub-graph is walked once no matter how many
    /// parents point at it. Passing the same `seen` set across several
    /// expressions extends this to the whole set.
    pub fn walk_wires(&self, seen: &mut HashSet<*const ExprNode>, mut f: impl FnMut(WireId)) {
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            if !seen.insert(Arc::as_ptr(&expr.0)) {
                continue;
            }
            match expr.node() {
                ExprNode::Const(_) => {}
                ExprNode::Wire(id) => f(*id),
                ExprNode::Unary { operand, .. } => stack.push(operand),
                ExprNode::Binary { lhs, rhs, .. } => {
                    stack.push(rhs);
                    stack.push(lhs);
                }
                ExprNode::Select {
                    condition,
                    then_val,
                    else_val,
                } => {
                    stack.push(else_val);
                    stack.push(then_val);
                    stack.push(condition);
                }
            }
        }
    }

    /// Returns each distinct wire referenced by this expression, in
    /// left-to-right order of first appearance.
    pub fn referenced_wires(&self) -> Vec<WireId> {
        let mut seen = HashSet::new();
        let mut wires = Vec::new();
        self.walk_wires(&mut seen, |id| {
            if !wires.contains(&id) {
                wires.push(id);
            }
        });
        wires
    }

    /// Renders the expression in infix form, naming wires with `name`.
    pub(crate) fn render(
        &self,
        f: &mut dyn fmt::Write,
        name: &dyn Fn(WireId) -> String,
    ) -> fmt::Result {
        match self.node() {
            ExprNode::Const(v) => write!(f, "{v}"),
            ExprNode::Wire(id) => write!(f, "{}", name(*id)),
            ExprNode::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                operand.render_operand(f, name)
            }
            ExprNode::Binary { op, lhs, rhs } => {
                lhs.render_operand(f, name)?;
                write!(f, " {} ", op.symbol())?;
                rhs.render_operand(f, name)
            }
            ExprNode::Select {
                condition,
                then_val,
                else_val,
            } => {
                condition.render_operand(f, name)?;
                write!(f, " ? ")?;
                then_val.render_operand(f, name)?;
                write!(f, " : ")?;
                else_val.render_operand(f, name)
            }
        }
    }

    fn render_operand(
        &self,
        f: &mut dyn fmt::Write,
        name: &dyn Fn(WireId) -> String,
    ) -> fmt::Result {
        match self.node() {
            ExprNode::Const(v) if *v >= 0 => write!(f, "{v}"),
            ExprNode::Wire(_) => self.render(f, name),
            _ => {
                write!(f, "(")?;
                self.render(f, name)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, &|id| id.to_string())?;
        f.write_str(&out)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::constant(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::constant(i64::from(value))
    }
}

impl From<WireId> for Expr {
    fn from(id: WireId) -> Self {
        Expr::wire(id)
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}
