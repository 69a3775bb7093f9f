//! Top-level error type.
//!
//! Every failure a [`Processor`](crate::Processor) can latch is an [`Error`].
//! [`Error::kind`] flattens the nested sources into one [`ErrorKind`] for
//! callers that only need to branch on the category.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use piq_io::{ImageFormat, IoError};
use piq_ops::OpsError;
use thiserror::Error;

/// Result type for processor accessors. The error is shared, so repeated
/// reads of a latched failure hand out the same allocation.
pub type Result<T> = std::result::Result<T, Arc<Error>>;

/// Processor error.
#[derive(Debug, Error)]
pub enum Error {
    /// The processor was constructed without an image.
    #[error("no input image was provided")]
    NilInput,

    /// `from_bytes` was given an empty slice.
    #[error("input byte slice is empty")]
    EmptyInput,

    /// Input bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[source] IoError),

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The current image could not be encoded.
    #[error("failed to encode image as {format}: {source}")]
    Encode {
        /// Requested format.
        format: ImageFormat,
        /// Underlying encoder error.
        #[source]
        source: IoError,
    },

    /// Geometry or buffer error.
    #[error(transparent)]
    Core(#[from] piq_core::Error),

    /// Transform error.
    #[error(transparent)]
    Ops(#[from] OpsError),
}

/// Flat failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No image supplied.
    NilInput,
    /// Empty input bytes.
    EmptyInput,
    /// Bytes are not a decodable image.
    DecodeFailure,
    /// Non-positive or inconsistent dimensions.
    InvalidDimensions,
    /// Rectangle outside the image.
    OutOfBounds,
    /// Empty watermark text.
    EmptyText,
    /// Font data unreadable or unparsable.
    FontParseFailure,
    /// Sized face could not be created.
    FaceCreationFailure,
    /// Encoder failed.
    EncodeFailure,
    /// Format has no encoder or is not enabled.
    UnsupportedFormat,
    /// File system error.
    Io,
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NilInput => ErrorKind::NilInput,
            Error::EmptyInput => ErrorKind::EmptyInput,
            Error::Decode(IoError::EmptyInput) => ErrorKind::EmptyInput,
            Error::Decode(_) => ErrorKind::DecodeFailure,
            Error::Io { .. } => ErrorKind::Io,
            Error::Encode { source, .. } => match source {
                IoError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
                IoError::Io(_) => ErrorKind::Io,
                _ => ErrorKind::EncodeFailure,
            },
            Error::Core(e) => core_kind(e),
            Error::Ops(e) => match e {
                OpsError::EmptyText => ErrorKind::EmptyText,
                OpsError::FontParse(_) | OpsError::FontLoad { .. } => ErrorKind::FontParseFailure,
                OpsError::FaceCreation(_) => ErrorKind::FaceCreationFailure,
                OpsError::Core(e) => core_kind(e),
            },
        }
    }
}

fn core_kind(e: &piq_core::Error) -> ErrorKind {
    match e {
        piq_core::Error::OutOfBounds { .. } => ErrorKind::OutOfBounds,
        piq_core::Error::InvalidDimensions { .. }
        | piq_core::Error::TooLarge { .. }
        | piq_core::Error::InvalidStride { .. }
        | piq_core::Error::BufferSize { .. } => ErrorKind::InvalidDimensions,
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::EmptyInput => Error::EmptyInput,
            other => Error::Decode(other),
        }
    }
}
