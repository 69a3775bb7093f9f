//! PNG format support.
//!
//! Decodes every PNG color type and bit depth into RGBA8 (palettes are
//! expanded, 16-bit samples are stripped to their high byte) and encodes
//! RGBA8 losslessly.
//!
//! # Example
//!
//! ```rust,ignore
//! use piq_io::png::PngCodec;
//! use piq_io::{FormatReader, FormatWriter};
//!
//! let image = PngCodec.read("input.png")?;
//! PngCodec.write("output.png", &image)?;
//! ```

use crate::{FormatReader, FormatWriter, ImageFormat, IoError, IoResult};
use piq_core::PixelBuffer;
use std::io::Cursor;

/// PNG reader and writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl FormatReader for PngCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
        let mut decoder = png::Decoder::new(Cursor::new(data));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

        let buf_size = reader
            .output_buffer_size()
            .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
        let mut buf = vec![0u8; buf_size];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

        let (width, height) = (info.width, info.height);
        let samples = &buf[..info.buffer_size()];

        // EXPAND + STRIP_16 leave only 8-bit gray/gray-alpha/RGB/RGBA
        let image = match info.color_type {
            png::ColorType::Rgba => PixelBuffer::from_raw(width, height, samples.to_vec()),
            png::ColorType::Rgb => PixelBuffer::from_rgb8(width, height, samples),
            png::ColorType::Grayscale => PixelBuffer::from_gray8(width, height, samples),
            png::ColorType::GrayscaleAlpha => PixelBuffer::from_gray_alpha8(width, height, samples),
            other => {
                return Err(IoError::DecodeError(format!("unexpected PNG output color type {other:?}")));
            }
        };
        image.map_err(|e| IoError::DecodeError(e.to_string()))
    }
}

impl FormatWriter for PngCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn write_to_memory(&self, image: &PixelBuffer) -> IoResult<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_compression(png::Compression::default());
            encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

            let mut writer = encoder
                .write_header()
                .map_err(|e| IoError::EncodeError(e.to_string()))?;
            writer
                .write_image_data(&image.to_packed())
                .map_err(|e| IoError::EncodeError(e.to_string()))?;
            writer.finish().map_err(|e| IoError::EncodeError(e.to_string()))?;
        }
        Ok(out)
    }
}
