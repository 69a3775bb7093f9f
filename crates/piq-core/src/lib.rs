//! # piq-core
//!
//! Core types for the piq image pipeline.
//!
//! This crate provides the foundational types used throughout piq:
//!
//! - [`PixelBuffer`] - Interleaved RGBA8 raster with an explicit row stride
//! - [`Rect`] - Rectangles with a signed origin, used for crop and copy regions
//! - [`Error`] - Buffer, bounds and dimension errors
//! - [`luminance_rec709_u8`] - The BT.709 luma weighting shared by every grayscale path
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. Every other piq crate depends on it:
//!
//! ```text
//! piq-core (this crate)
//!    ^
//!    |
//!    +-- piq-io  (decode / encode)
//!    +-- piq-ops (grayscale, crop, resize, watermark)
//!    +-- piq     (chainable Processor)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod pixel;
pub mod rect;

pub use buffer::{PixelBuffer, CHANNELS};
pub use error::{Error, Result};
pub use pixel::{luminance_rec709_u8, REC709_LUMA, REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R};
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// ```
/// use piq_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::PixelBuffer;
    pub use crate::error::{Error, Result};
    pub use crate::pixel::luminance_rec709_u8;
    pub use crate::rect::Rect;
}
