//! Circuit IR for tinyrtl: wires, expression graphs, and the wire registry.
//!
//! This crate defines [`Expr`], the immutable shared expression graph, [`Wire`],
//! a named storage cell with optional combinational and next-cycle
//! definitions, and [`Circuit`], the arena that owns every wire and hands out
//! stable [`WireId`] handles.

#![warn(missing_docs)]

pub mod arena;
pub mod circuit;
pub mod expr;
pub mod ids;
mod ops;
pub mod wire;

pub use circuit::Circuit;
pub use expr::{BinaryOp, Expr, ExprNode, UnaryOp};
pub use ids::WireId;
pub use wire::Wire;
