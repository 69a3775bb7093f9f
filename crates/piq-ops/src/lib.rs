//! # piq-ops
//!
//! Pixel transforms for the piq image pipeline.
//!
//! Every operation reads a [`PixelBuffer`](piq_core::PixelBuffer) and returns
//! a newly allocated one; sources are never modified.
//!
//! # Modules
//!
//! - [`grayscale`] - Sequential Rec.709 grayscale
//! - [`parallel`] - Strip-parallel grayscale and its tuning
//! - [`transform`] - Crop
//! - [`resize`] - Image scaling and resampling
//! - [`text`] - Font parsing, measuring and glyph rasterization
//! - [`watermark`] - Anchored text watermarks
//!
//! # Example
//!
//! ```rust
//! use piq_core::PixelBuffer;
//! use piq_ops::{crop, grayscale_auto, resize, Filter, PerformanceConfig};
//!
//! let src = PixelBuffer::filled(320, 240, [200, 120, 40, 255]);
//! let small = resize(&src, 160, 120, Filter::default()).unwrap();
//! let center = crop(&small, 40, 30, 80, 60).unwrap();
//! let gray = grayscale_auto(&center, &PerformanceConfig::default());
//! assert_eq!(gray.dimensions(), (80, 60));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod grayscale;
pub mod parallel;
pub mod resize;
pub mod text;
pub mod transform;
pub mod watermark;

pub use error::{OpsError, OpsResult};
pub use grayscale::grayscale;
pub use parallel::{grayscale_auto, grayscale_parallel, PerformanceConfig};
pub use resize::{resize, Filter};
pub use transform::crop;
pub use watermark::{add_text_watermark, Position, WatermarkConfig, WatermarkOption};
