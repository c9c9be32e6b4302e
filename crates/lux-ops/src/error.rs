//! Error types for display passes.

use thiserror::Error;

/// Error type for display passes.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),
}

/// Result type for display passes.
pub type OpsResult<T> = Result<T, OpsError>;
