//! JPEG format support.
//!
//! Decoding uses `jpeg-decoder` and accepts RGB, grayscale (8 and 16 bit)
//! and CMYK sources. Encoding uses `jpeg-encoder`; JPEG has no alpha, so the
//! alpha channel is dropped on write.
//!
//! # Example
//!
//! ```rust,ignore
//! use piq_io::jpeg::JpegCodec;
//! use piq_io::FormatWriter;
//!
//! let bytes = JpegCodec::with_quality(75).write_to_memory(&image)?;
//! ```

use crate::{FormatReader, FormatWriter, ImageFormat, IoError, IoResult};
use piq_core::PixelBuffer;
use std::io::Cursor;

/// Default encoder quality.
pub const DEFAULT_QUALITY: u8 = 90;

/// JPEG reader and writer.
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    /// Quality level 1-100. Higher = better quality, larger files.
    pub quality: u8,
}

impl JpegCodec {
    /// Creates a codec encoding at [`DEFAULT_QUALITY`].
    pub fn new() -> Self {
        Self::with_quality(DEFAULT_QUALITY)
    }

    /// Creates a codec encoding at `quality` (clamped to 1-100).
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatReader for JpegCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
        let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(data));
        let pixels = decoder
            .decode()
            .map_err(|e| IoError::DecodeError(e.to_string()))?;

        let info = decoder
            .info()
            .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

        let width = info.width as u32;
        let height = info.height as u32;

        let image = match info.pixel_format {
            jpeg_decoder::PixelFormat::RGB24 => PixelBuffer::from_rgb8(width, height, &pixels),
            jpeg_decoder::PixelFormat::L8 => PixelBuffer::from_gray8(width, height, &pixels),
            jpeg_decoder::PixelFormat::L16 => {
                // Big-endian samples, keep the high byte
                let gray: Vec<u8> = pixels.chunks_exact(2).map(|l16| l16[0]).collect();
                PixelBuffer::from_gray8(width, height, &gray)
            }
            jpeg_decoder::PixelFormat::CMYK32 => {
                // Approximate CMYK to RGB
                let rgb: Vec<u8> = pixels
                    .chunks_exact(4)
                    .flat_map(|cmyk| {
                        let k = 1.0 - cmyk[3] as f32 / 255.0;
                        let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0) as u8;
                        [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
                    })
                    .collect();
                PixelBuffer::from_rgb8(width, height, &rgb)
            }
        };
        image.map_err(|e| IoError::DecodeError(e.to_string()))
    }
}

impl FormatWriter for JpegCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn write_to_memory(&self, image: &PixelBuffer) -> IoResult<Vec<u8>> {
        use jpeg_encoder::{ColorType, Encoder};

        let (width, height) = image.dimensions();
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(IoError::EncodeError(format!(
                    "{width}x{height} exceeds the JPEG limit of 65535 pixels per side"
                )));
            }
        };

        // Strip alpha
        let rgb: Vec<u8> = image
            .to_packed()
            .chunks_exact(4)
            .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
            .collect();

        let mut buffer = Vec::new();
        let encoder = Encoder::new(&mut buffer, self.quality);
        encoder
            .encode(&rgb, w, h, ColorType::Rgb)
            .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

        Ok(buffer)
    }
}
