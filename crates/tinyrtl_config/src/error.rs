//! Error types for circuit description loading and validation.

/// Errors that can occur when loading or validating a circuit description.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the description file.
    #[error("failed to read circuit description: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse circuit description: {0}")]
    ParseError(String),

    /// A `[sim]` target names a wire that is not declared.
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    /// An expression references a wire that is not declared.
    #[error("wire '{wire}' references undeclared wire '{name}'")]
    UnknownWire {
        /// The wire whose expression holds the reference.
        wire: String,
        /// The undeclared name.
        name: String,
    },

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
