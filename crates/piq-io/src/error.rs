//! Error types for I/O operations.
//!
//! Provides unified error handling for all format operations.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Zero-length input.
    #[error("input byte slice is empty")]
    EmptyInput,

    /// Unsupported format (unknown magic bytes, unknown tag, or a codec
    /// without an encoder).
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),
}

impl IoError {
    /// Returns `true` for [`IoError::UnsupportedFormat`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
