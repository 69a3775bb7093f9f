//! Codec traits for format readers and writers.
//!
//! These traits define the interface for format-specific implementations.

use crate::{ImageFormat, IoResult};
use piq_core::PixelBuffer;
use std::path::Path;

/// Trait for image format readers.
///
/// Every reader produces an RGBA8 [`PixelBuffer`], whatever the source
/// channel layout.
pub trait FormatReader {
    /// Format handled by this reader.
    fn format(&self) -> ImageFormat;

    /// Returns `true` if `header` starts with this format's signature.
    fn can_read(&self, header: &[u8]) -> bool {
        ImageFormat::from_bytes(header) == self.format()
    }

    /// Decodes an image from memory.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer>;

    /// Reads and decodes an image file.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<PixelBuffer> {
        let data = std::fs::read(path.as_ref())?;
        self.read_from_memory(&data)
    }
}

/// Trait for image format writers.
pub trait FormatWriter {
    /// Format handled by this writer.
    fn format(&self) -> ImageFormat;

    /// Encodes an image to memory.
    fn write_to_memory(&self, image: &PixelBuffer) -> IoResult<Vec<u8>>;

    /// Encodes an image and writes it to a file.
    fn write<P: AsRef<Path>>(&self, path: P, image: &PixelBuffer) -> IoResult<()> {
        let data = self.write_to_memory(image)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }
}
