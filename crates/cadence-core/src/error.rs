//! Core error types for cadence-core.
//!
//! Configuration and plan errors are fatal: every core operation is
//! deterministic and in-memory, so there is nothing to retry.

use thiserror::Error;

/// Core error type for cadence-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan construction and traversal errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration file serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Plan-specific errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    /// Advance requested with the cursor already on the final entry
    #[error("Cursor {cursor} is already on the final entry (plan length: {len})")]
    OutOfRange { cursor: usize, len: usize },

    /// A logic defect: the sequencer or plan broke its own contract
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
