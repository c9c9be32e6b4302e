//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while building or loading a LUT.
#[derive(Debug, Error)]
pub enum LutError {
    /// Entry count or cube size is invalid.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// Strip dimensions match no packed layout.
    #[error("invalid packed layout: {width}x{height} ({reason})")]
    InvalidLayout {
        /// Strip width
        width: u32,
        /// Strip height
        height: u32,
        /// Why the layout was rejected
        reason: String,
    },

    /// Image decoding failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
