//! Parsing and validation of `circuit.toml` circuit descriptions.
//!
//! This crate reads a circuit description file and produces a strongly-typed
//! [`CircuitConfig`], then builds it into a [`Circuit`](tinyrtl_ir::Circuit)
//! plus the [`SimConfig`](tinyrtl_sim::SimConfig) requested by its `[sim]`
//! table.

#![warn(missing_docs)]

pub mod build;
pub mod error;
pub mod loader;
pub mod types;

pub use build::{build_circuit, BuiltCircuit};
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
