//! # piq-io
//!
//! Format boundary for the piq image pipeline.
//!
//! Every decoder produces an RGBA8 [`PixelBuffer`]; every encoder consumes
//! one. Nothing else in piq knows about file formats.
//!
//! # Architecture
//!
//! - [`FormatReader`] - Trait for format readers
//! - [`FormatWriter`] - Trait for format writers
//! - [`decode`] / [`encode`] - In-memory dispatch by magic bytes / format tag
//! - [`read`] / [`write`] - File-level wrappers
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use piq_io::{decode, encode, ImageFormat};
//!
//! let image = decode(&std::fs::read("photo.jpg")?)?;
//! let png = encode(&image, ImageFormat::Png)?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Notes |
//! |--------|------|-------|-------|
//! | PNG | Yes | Yes | Lossless, alpha |
//! | JPEG | Yes | Yes | Quality 90, alpha dropped |
//! | GIF | Yes | No | First frame only |
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)
//! - `gif` - GIF decoding (default)
//!
//! A format whose feature is disabled is reported as unsupported.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;
mod traits;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

#[cfg(feature = "gif")]
pub mod gif;

pub use detect::ImageFormat;
pub use error::{IoError, IoResult};
pub use traits::{FormatReader, FormatWriter};

use piq_core::PixelBuffer;
use std::path::Path;
use tracing::{debug, trace};

/// Decodes an image from memory, detecting the format from its magic bytes.
///
/// # Errors
///
/// - [`IoError::EmptyInput`] for a zero-length slice
/// - [`IoError::UnsupportedFormat`] if no enabled decoder recognises the data
/// - [`IoError::DecodeError`] if the recognised decoder fails
#[allow(unreachable_patterns)]
pub fn decode(data: &[u8]) -> IoResult<PixelBuffer> {
    if data.is_empty() {
        return Err(IoError::EmptyInput);
    }

    let format = ImageFormat::from_bytes(data);
    trace!(%format, len = data.len(), "decode");

    let image = match format {
        #[cfg(feature = "png")]
        ImageFormat::Png => png::PngCodec.read_from_memory(data),

        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::JpegCodec::new().read_from_memory(data),

        #[cfg(feature = "gif")]
        ImageFormat::Gif => gif::GifCodec.read_from_memory(data),

        ImageFormat::Unknown => Err(IoError::UnsupportedFormat(
            "unrecognised image data".to_string(),
        )),

        other => Err(IoError::UnsupportedFormat(format!("{other} support is not enabled"))),
    }?;

    debug!(%format, width = image.width(), height = image.height(), "decoded image");
    Ok(image)
}

/// Encodes an image into `format`.
///
/// # Errors
///
/// - [`IoError::UnsupportedFormat`] for [`ImageFormat::Unknown`],
///   [`ImageFormat::Gif`], or a format whose feature is disabled
/// - [`IoError::EncodeError`] if the encoder fails
#[allow(unreachable_patterns)]
pub fn encode(image: &PixelBuffer, format: ImageFormat) -> IoResult<Vec<u8>> {
    trace!(%format, width = image.width(), height = image.height(), "encode");

    match format {
        #[cfg(feature = "png")]
        ImageFormat::Png => png::PngCodec.write_to_memory(image),

        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::JpegCodec::new().write_to_memory(image),

        ImageFormat::Gif => Err(IoError::UnsupportedFormat(
            "gif encoding is not supported".to_string(),
        )),

        ImageFormat::Unknown => Err(IoError::UnsupportedFormat(
            "cannot encode to unknown format".to_string(),
        )),

        other => Err(IoError::UnsupportedFormat(format!("{other} support is not enabled"))),
    }
}

/// Reads and decodes an image file.
///
/// The format is detected from the file contents, not the extension.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let data = std::fs::read(path.as_ref())?;
    decode(&data)
}

/// Encodes an image and writes it to `path`.
///
/// Nothing is written if encoding fails.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer, format: ImageFormat) -> IoResult<()> {
    let data = encode(image, format)?;
    std::fs::write(path.as_ref(), data)?;
    Ok(())
}
