//! Operator sugar for building expressions with infix syntax.
//!
//! Every impl here is a thin wrapper around [`Expr::binary`] or
//! [`Expr::unary`]; comparisons and logical operators have no overloadable
//! Rust operator that returns an [`Expr`], so they are named methods on
//! [`Expr`] instead.
//!
//! Prefix `!` builds a bitwise NOT ([`UnaryOp::Not`]), the same as `!` on
//! Rust integers. C++ expression DSLs commonly overload `!` as logical NOT;
//! circuits ported from one should use [`Expr::logic_not`], which yields
//! `0` or `1`.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

use crate::expr::{BinaryOp, Expr, UnaryOp};

macro_rules! binary_sugar {
    ($($trait:ident :: $method:ident => $op:ident),* $(,)?) => {
        $(
            impl<R: Into<Expr>> $trait<R> for Expr {
                type Output = Expr;

                fn $method(self, rhs: R) -> Expr {
                    Expr::binary(BinaryOp::$op, self, rhs)
                }
            }

            impl<R: Into<Expr>> $trait<R> for &Expr {
                type Output = Expr;

                fn $method(self, rhs: R) -> Expr {
                    Expr::binary(BinaryOp::$op, self, rhs)
                }
            }

            impl $trait<Expr> for i64 {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    Expr::binary(BinaryOp::$op, self, rhs)
                }
            }

            impl $trait<&Expr> for i64 {
                type Output = Expr;

                fn $method(self, rhs: &Expr) -> Expr {
                    Expr::binary(BinaryOp::$op, self, rhs)
                }
            }
        )*
    };
}

binary_sugar! {
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
    Rem::rem => Mod,
    BitAnd::bitand => And,
    BitOr::bitor => Or,
    BitXor::bitxor => Xor,
    Shl::shl => Shl,
    Shr::shr => Shr,
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::unary(UnaryOp::Neg, self)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::unary(UnaryOp::Neg, self)
    }
}

/// `!expr` is bitwise NOT, matching `!` on Rust integers. Use
/// [`Expr::logic_not`] for boolean negation.
impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::unary(UnaryOp::Not, self)
    }
}

impl Not for &Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::unary(UnaryOp::Not, self)
    }
}
