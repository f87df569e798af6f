//! Simulation error types.
//!
//! Expression evaluation itself is total and never fails; these errors only
//! report a simulation request that does not fit the circuit it was made
//! against.

use tinyrtl_ir::WireId;

/// Errors that can occur when setting up a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A target, or a wire referenced by an expression, is not part of the circuit.
    #[error("wire {0} does not belong to this circuit")]
    UnknownWire(WireId),

    /// Two distinct wires in the dependency closure share a name, so their
    /// histories would collide.
    #[error("wire name '{0}' is used by more than one simulated wire")]
    DuplicateName(String),
}
