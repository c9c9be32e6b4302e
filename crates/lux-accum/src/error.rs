//! Error types for accumulation and sessions.

use thiserror::Error;

/// Result type for accumulation and session operations.
pub type AccumResult<T> = Result<T, AccumError>;

/// Errors raised by the accumulation buffer, sessions and settings loading.
#[derive(Debug, Error)]
pub enum AccumError {
    /// Buffer allocation or dimension error.
    #[error(transparent)]
    Core(#[from] lux_core::Error),

    /// Display pass failure.
    #[error(transparent)]
    Ops(#[from] lux_ops::OpsError),

    /// Settings could not be parsed.
    #[error("invalid settings: {0}")]
    Config(#[from] serde_yaml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session worker panicked or its driver failed.
    #[error("session worker failed: {0}")]
    Worker(String),
}
