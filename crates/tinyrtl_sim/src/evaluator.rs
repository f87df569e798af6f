//! Expression evaluation with per-cycle memoization.
//!
//! [`eval_expr`] recursively evaluates an [`Expr`] graph to an `i64`, reading
//! wire values through an [`EvalContext`]. Every operator is total: division
//! and remainder by zero yield `0`, and overflow wraps.
//!
//! A combinational wire is evaluated at most once per context; later reads in
//! the same cycle are served from the memo table. A fresh context must be
//! used for each cycle, because a combinational value may change once
//! upstream registers commit.
//!
//! Combinational definitions must not form a cycle. A wire whose
//! combinational expression reads itself, directly or through other
//! combinational wires, recurses without bound.

use std::collections::HashMap;

use tinyrtl_ir::{BinaryOp, Circuit, Expr, ExprNode, UnaryOp, WireId};

/// Evaluation state for a single cycle.
///
/// Holds the circuit being read (committed values and definitions) and the
/// memo table of combinational values computed so far in this cycle.
pub struct EvalContext<'a> {
    circuit: &'a Circuit,
    memo: HashMap<WireId, i64>,
}

impl<'a> EvalContext<'a> {
    /// Creates a context with an empty memo table.
    pub fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            memo: HashMap::new(),
        }
    }

    /// Returns the current value of a wire.
    ///
    /// Combinational wires evaluate their definition (once per context);
    /// all others return their committed value. A handle that does not
    /// belong to the circuit reads as `0`.
    pub fn wire_value(&mut self, id: WireId) -> i64 {
        let circuit = self.circuit;
        let Some(wire) = circuit.get(id) else {
            return 0;
        };
        match &wire.comb {
            Some(comb) => {
                if let Some(&v) = self.memo.get(&id) {
                    return v;
                }
                let v = eval_expr(self, comb);
                self.memo.insert(id, v);
                v
            }
            None => wire.committed,
        }
    }

    /// Returns the memoized combinational value of `id`, if it has been
    /// evaluated in this context.
    pub fn memoized(&self, id: WireId) -> Option<i64> {
        self.memo.get(&id).copied()
    }

    /// Returns the number of combinational wires evaluated so far.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }
}

/// Coerces a value to a boolean: nonzero is true.
pub fn is_truthy(v: i64) -> bool {
    v != 0
}

fn bool_value(b: bool) -> i64 {
    i64::from(b)
}

/// Evaluates an expression in the given context.
///
/// Children are evaluated left to right. `select` evaluates only the taken
/// branch, and logical AND/OR skip the right operand once the left one
/// decides the result.
pub fn eval_expr(ctx: &mut EvalContext<'_>, expr: &Expr) -> i64 {
    match expr.node() {
        ExprNode::Const(v) => *v,

        ExprNode::Wire(id) => ctx.wire_value(*id),

        ExprNode::Unary { op, operand } => {
            let v = eval_expr(ctx, operand);
            eval_unary(*op, v)
        }

        ExprNode::Binary {
            op: BinaryOp::LogicAnd,
            lhs,
            rhs,
        } => bool_value(is_truthy(eval_expr(ctx, lhs)) && is_truthy(eval_expr(ctx, rhs))),

        ExprNode::Binary {
            op: BinaryOp::LogicOr,
            lhs,
            rhs,
        } => bool_value(is_truthy(eval_expr(ctx, lhs)) || is_truthy(eval_expr(ctx, rhs))),

        ExprNode::Binary { op, lhs, rhs } => {
            let l = eval_expr(ctx, lhs);
            let r = eval_expr(ctx, rhs);
            eval_binary(*op, l, r)
        }

        ExprNode::Select {
            condition,
            then_val,
            else_val,
        } => {
            if is_truthy(eval_expr(ctx, condition)) {
                eval_expr(ctx, then_val)
            } else {
                eval_expr(ctx, else_val)
            }
        }
    }
}

fn eval_unary(op: UnaryOp, v: i64) -> i64 {
    match op {
        UnaryOp::Neg => v.wrapping_neg(),
        UnaryOp::Not => !v,
        UnaryOp::LogicNot => bool_value(!is_truthy(v)),
    }
}

/// Applies a non-short-circuiting binary operator to two evaluated operands.
fn eval_binary(op: BinaryOp, l: i64, r: i64) -> i64 {
    match op {
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Sub => l.wrapping_sub(r),
        BinaryOp::Mul => l.wrapping_mul(r),
        BinaryOp::Div => {
            if r == 0 {
                0
            } else {
                l.wrapping_div(r)
            }
        }
        BinaryOp::Mod => {
            if r == 0 {
                0
            } else {
                l.wrapping_rem(r)
            }
        }

        BinaryOp::And => l & r,
        BinaryOp::Or => l | r,
        BinaryOp::Xor => l ^ r,

        // Amounts outside 0..64 shift everything out.
        BinaryOp::Shl => match u32::try_from(r) {
            Ok(s) if s < 64 => l << s,
            _ => 0,
        },
        BinaryOp::Shr => match u32::try_from(r) {
            Ok(s) if s < 64 => l >> s,
            _ => l >> 63,
        },

        BinaryOp::Eq => bool_value(l == r),
        BinaryOp::Ne => bool_value(l != r),
        BinaryOp::Lt => bool_value(l < r),
        BinaryOp::Le => bool_value(l <= r),
        BinaryOp::Gt => bool_value(l > r),
        BinaryOp::Ge => bool_value(l >= r),

        BinaryOp::LogicAnd => bool_value(is_truthy(l) && is_truthy(r)),
        BinaryOp::LogicOr => bool_value(is_truthy(l) || is_truthy(r)),
    }
}
