//! # piq
//!
//! Fluent image processing with a sticky first error.
//!
//! [`Processor`] wraps one RGBA8 image and chains crop, resize, grayscale and
//! text watermark operations. Operations never return errors directly: the
//! first failure is latched and every later call becomes a no-op, so a whole
//! chain is checked once at the end.
//!
//! # Crates
//!
//! ```text
//! piq          Processor, Error, ErrorKind
//! ├── piq-ops  crop, resize, grayscale (sequential and strip-parallel), watermark
//! ├── piq-io   PNG / JPEG / GIF decode, PNG / JPEG encode
//! └── piq-core PixelBuffer, Rect, Rec.709 luminance
//! ```
//!
//! # Example
//!
//! ```rust
//! use piq::{ErrorKind, ImageFormat, PixelBuffer, Processor};
//!
//! let p = Processor::new(PixelBuffer::filled(200, 150, [255, 0, 0, 255]));
//! p.crop(10, 10, 100, 100).resize(50, 50).grayscale();
//! let png = p.to_bytes(ImageFormat::Png).unwrap();
//!
//! let back = Processor::from_bytes(&png);
//! assert_eq!(back.image().unwrap().dimensions(), (50, 50));
//!
//! // Failures are latched.
//! p.crop(150, 0, 100, 50).grayscale();
//! assert_eq!(p.last_error().unwrap().kind(), ErrorKind::OutOfBounds);
//! ```
//!
//! # Features
//!
//! - `png`, `jpeg`, `gif` (default) - codec support
//! - `serde` - serialization for [`ImageFormat`], [`Position`] and
//!   [`PerformanceConfig`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod processor;

pub use error::{Error, ErrorKind, Result};
pub use processor::Processor;

pub use piq_core::{PixelBuffer, Rect};
pub use piq_io::ImageFormat;
pub use piq_ops::parallel::DEFAULT_MIN_PARALLEL_PIXELS;
pub use piq_ops::watermark::{
    with_color, with_dpi, with_font_bytes, with_font_path, with_font_size, with_offset, with_position,
};
pub use piq_ops::{Filter, PerformanceConfig, Position, WatermarkConfig, WatermarkOption};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Error, ErrorKind, Filter, ImageFormat, PerformanceConfig, PixelBuffer, Position, Processor, Rect,
        Result, WatermarkOption,
    };
}
