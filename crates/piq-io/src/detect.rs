//! Format tags and detection.
//!
//! Detects image formats from magic bytes, file extensions and names.

use std::fmt;
use std::path::Path;

/// Encoded raster formats known to piq.
///
/// `Unknown` is a real tag: encoding to it is reported as an unsupported
/// format rather than silently picking a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageFormat {
    /// Unknown/unsupported format.
    #[default]
    Unknown,
    /// JPEG format (lossy, no alpha).
    Jpeg,
    /// PNG format (lossless, alpha).
    Png,
    /// GIF format (decode only).
    Gif,
}

impl ImageFormat {
    /// Parses a format name, case-insensitively.
    ///
    /// Unrecognised names map to [`ImageFormat::Unknown`].
    ///
    /// ```rust
    /// use piq_io::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::from_name("JPG"), ImageFormat::Jpeg);
    /// assert_eq!(ImageFormat::from_name("png"), ImageFormat::Png);
    /// assert_eq!(ImageFormat::from_name("tiff"), ImageFormat::Unknown);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "jpeg" | "jpg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            _ => ImageFormat::Unknown,
        }
    }

    /// Detects format from file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_name)
            .unwrap_or(ImageFormat::Unknown)
    }

    /// Detects format from raw bytes (magic number check).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // PNG: 0x89 0x50 0x4E 0x47 0x0D 0x0A 0x1A 0x0A
        if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return ImageFormat::Png;
        }

        // JPEG: 0xFF 0xD8 0xFF
        if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
            return ImageFormat::Jpeg;
        }

        // GIF: "GIF87a" / "GIF89a"
        if bytes.len() >= 6 && (&bytes[0..6] == b"GIF87a" || &bytes[0..6] == b"GIF89a") {
            return ImageFormat::Gif;
        }

        ImageFormat::Unknown
    }

    /// Returns the lowercase format name.
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Unknown => "unknown",
        }
    }

    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Unknown => "",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }

    /// Returns `true` if decoded pixels are not byte-exact after a round trip.
    pub fn is_lossy(&self) -> bool {
        matches!(self, ImageFormat::Jpeg)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
