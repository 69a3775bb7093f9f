//! Error types for piq-core operations.
//!
//! The [`Error`] enum covers the failure modes of buffer construction,
//! region copies and the geometric checks that crop and resize share.
//!
//! # Usage
//!
//! ```rust
//! use piq_core::{Error, Rect, Result};
//!
//! fn check(rect: Rect, bounds: Rect) -> Result<()> {
//!     if !bounds.contains_rect(&rect) {
//!         return Err(Error::out_of_bounds("crop", rect, bounds));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(Rect::new(150, 0, 100, 50), Rect::from_size(200, 150)).is_err());
//! ```
//!
//! # Used By
//!
//! - [`crate::buffer::PixelBuffer`] - Construction and region copies
//! - `piq-ops` - Crop and resize validation
//! - `piq` - Surfaced through the processor's latched error

use crate::Rect;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in buffer and geometry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Requested width or height is not strictly positive.
    ///
    /// Values are kept signed so the message shows exactly what the caller
    /// asked for, e.g. a negative crop width.
    #[error("{op} dimensions must be positive (width: {width}, height: {height})")]
    InvalidDimensions {
        /// Operation that rejected the size
        op: String,
        /// Requested width
        width: i64,
        /// Requested height
        height: i64,
    },

    /// A rectangle extends past the edge of the buffer it addresses.
    #[error("{op} rectangle {rect} is out of image bounds {bounds}")]
    OutOfBounds {
        /// Operation that rejected the rectangle
        op: String,
        /// Requested rectangle
        rect: Rect,
        /// Available bounds
        bounds: Rect,
    },

    /// Stride is too small for the given width.
    #[error("stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride
        stride: usize,
        /// Minimum required stride (`width * 4`)
        min_stride: usize,
        /// Buffer width
        width: u32,
    },

    /// Pixel storage for the requested size cannot be allocated.
    #[error("{width}x{height} image is too large to allocate")]
    TooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Raw data length does not match `stride * height`.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize {
        /// Expected byte count
        expected: usize,
        /// Provided byte count
        actual: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(op: impl Into<String>, width: i64, height: i64) -> Self {
        Self::InvalidDimensions {
            op: op.into(),
            width,
            height,
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(op: impl Into<String>, rect: Rect, bounds: Rect) -> Self {
        Self::OutOfBounds {
            op: op.into(),
            rect,
            bounds,
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this is a dimension error.
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. } | Self::TooLarge { .. })
    }
}
