//! Shared foundational types used across the tinyrtl workspace.
//!
//! Currently this is the interned identifier type used for wire names.

#![warn(missing_docs)]

pub mod ident;

pub use ident::{Ident, Interner};
