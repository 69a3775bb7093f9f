//! Text watermark: configuration, anchor placement and rendering.
//!
//! A [`WatermarkConfig`] starts from defaults (24pt white at 50% alpha,
//! bottom-right, 10px inset, 72 DPI, system sans-serif) and is adjusted by an
//! ordered list of [`WatermarkOption`]s.
//!
//! ```rust
//! use piq_ops::watermark::{with_color, with_offset, with_position, Position, WatermarkConfig};
//!
//! let cfg = WatermarkConfig::from_options(
//!     "(c) 2026",
//!     [with_position(Position::TopLeft), with_offset(4.0, 4.0), with_color([0, 0, 0, 255])],
//! );
//! assert_eq!(cfg.position, Position::TopLeft);
//! assert_eq!(cfg.font_size, 24.0);
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::text::{parse_font, TextFace};
use crate::{OpsError, OpsResult};
use piq_core::PixelBuffer;
use tracing::debug;

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
/// Default rendering resolution.
pub const DEFAULT_DPI: f64 = 72.0;
/// Default text color: white at 50% alpha.
pub const DEFAULT_COLOR: [u8; 4] = [255, 255, 255, 128];
/// Default inset from the anchored edges, in pixels.
pub const DEFAULT_OFFSET: f64 = 10.0;

/// Where the watermark is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Position {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    #[default]
    BottomRight,
    /// Centered both ways; offsets are ignored.
    Center,
}

impl Position {
    /// Parses a position name such as `"bottom-right"` or `"center"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(['_', ' '], "-").as_str() {
            "top-left" => Some(Position::TopLeft),
            "top-right" => Some(Position::TopRight),
            "bottom-left" => Some(Position::BottomLeft),
            "bottom-right" => Some(Position::BottomRight),
            "center" | "centre" => Some(Position::Center),
            _ => None,
        }
    }
}

/// Everything needed to render one watermark.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    /// Text to draw; must not be empty.
    pub text: String,
    /// Font data. Takes precedence over `font_path`.
    pub font_bytes: Option<Arc<[u8]>>,
    /// Font file, read at render time.
    pub font_path: Option<PathBuf>,
    /// Size in points.
    pub font_size: f64,
    /// Dots per inch used to turn points into pixels.
    pub dpi: f64,
    /// Straight-alpha RGBA.
    pub color: [u8; 4],
    /// Anchor.
    pub position: Position,
    /// Horizontal inset in pixels; may be fractional.
    pub offset_x: f64,
    /// Vertical inset in pixels; may be fractional.
    pub offset_y: f64,
}

impl WatermarkConfig {
    /// Default configuration for `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_bytes: None,
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            dpi: DEFAULT_DPI,
            color: DEFAULT_COLOR,
            position: Position::default(),
            offset_x: DEFAULT_OFFSET,
            offset_y: DEFAULT_OFFSET,
        }
    }

    /// Default configuration for `text` with `options` applied in order.
    pub fn from_options(text: impl Into<String>, options: impl IntoIterator<Item = WatermarkOption>) -> Self {
        let mut config = Self::new(text);
        for option in options {
            option.apply(&mut config);
        }
        config
    }
}

/// A single adjustment to a [`WatermarkConfig`].
pub struct WatermarkOption(Box<dyn FnOnce(&mut WatermarkConfig) + Send>);

impl WatermarkOption {
    /// Wraps an arbitrary mutation.
    pub fn new(f: impl FnOnce(&mut WatermarkConfig) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Applies this option.
    pub fn apply(self, config: &mut WatermarkConfig) {
        (self.0)(config)
    }
}

impl fmt::Debug for WatermarkOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WatermarkOption")
    }
}

/// Uses the given font data.
pub fn with_font_bytes(bytes: impl Into<Arc<[u8]>>) -> WatermarkOption {
    let bytes = bytes.into();
    WatermarkOption::new(move |c| c.font_bytes = Some(bytes))
}

/// Loads the font from a file.
pub fn with_font_path(path: impl Into<PathBuf>) -> WatermarkOption {
    let path = path.into();
    WatermarkOption::new(move |c| c.font_path = Some(path))
}

/// Sets the size in points.
pub fn with_font_size(size: f64) -> WatermarkOption {
    WatermarkOption::new(move |c| c.font_size = size)
}

/// Sets the text color.
pub fn with_color(color: [u8; 4]) -> WatermarkOption {
    WatermarkOption::new(move |c| c.color = color)
}

/// Sets the anchor.
pub fn with_position(position: Position) -> WatermarkOption {
    WatermarkOption::new(move |c| c.position = position)
}

/// Sets the inset from the anchored edges.
pub fn with_offset(x: f64, y: f64) -> WatermarkOption {
    WatermarkOption::new(move |c| {
        c.offset_x = x;
        c.offset_y = y;
    })
}

/// Sets the rendering DPI.
pub fn with_dpi(dpi: f64) -> WatermarkOption {
    WatermarkOption::new(move |c| c.dpi = dpi)
}

/// Measured text block used for placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBlock {
    /// Ink width.
    pub width: f32,
    /// Line height.
    pub height: f32,
    /// Ascent above the baseline.
    pub ascent: f32,
    /// Descent below the baseline.
    pub descent: f32,
}

/// Baseline origin of the text for `position`.
///
/// All arithmetic is done in `f64`; only the final coordinates are truncated
/// toward zero.
///
/// ```rust
/// use piq_ops::watermark::{anchor, Position, TextBlock};
///
/// let block = TextBlock { width: 50.0, height: 20.0, ascent: 15.0, descent: 5.0 };
/// assert_eq!(anchor(Position::BottomRight, 200, 100, block, 10.0, 10.0), (140, 85));
/// assert_eq!(anchor(Position::Center, 200, 100, block, 10.0, 10.0), (75, 55));
/// ```
pub fn anchor(position: Position, image_w: u32, image_h: u32, block: TextBlock, offset_x: f64, offset_y: f64) -> (i32, i32) {
    let (w, h) = (image_w as f64, image_h as f64);
    let (tw, th) = (block.width as f64, block.height as f64);
    let (ascent, descent) = (block.ascent as f64, block.descent as f64);
    let (ox, oy) = (offset_x, offset_y);

    let (x, y) = match position {
        Position::TopLeft => (ox, oy + ascent),
        Position::TopRight => (w - tw - ox, oy + ascent),
        Position::BottomLeft => (ox, h - oy - descent),
        Position::BottomRight => (w - tw - ox, h - oy - descent),
        Position::Center => ((w - tw) / 2.0, (h - th) / 2.0 + ascent),
    };
    (x as i32, y as i32)
}

/// Loads the face named by `config`: bytes, then path, then system font.
pub fn resolve_face(config: &WatermarkConfig) -> OpsResult<TextFace> {
    if let Some(bytes) = &config.font_bytes {
        let font = parse_font(bytes)?;
        return TextFace::new(&font, config.font_size, config.dpi);
    }
    if let Some(path) = &config.font_path {
        let bytes = std::fs::read(path).map_err(|source| OpsError::FontLoad {
            path: path.clone(),
            source,
        })?;
        let font = parse_font(&bytes)?;
        return TextFace::new(&font, config.font_size, config.dpi);
    }
    TextFace::system(config.font_size, config.dpi)
}

/// Returns a copy of `src` with the watermark drawn on it.
///
/// # Errors
///
/// - [`OpsError::EmptyText`] if `config.text` is empty
/// - [`OpsError::FontParse`] / [`OpsError::FontLoad`] if the font cannot be read
/// - [`OpsError::FaceCreation`] for a bad size/DPI or an unusable font
pub fn add_text_watermark(src: &PixelBuffer, config: &WatermarkConfig) -> OpsResult<PixelBuffer> {
    if config.text.is_empty() {
        return Err(OpsError::EmptyText);
    }

    let mut face = resolve_face(config)?;
    let extent = face.measure(&config.text);
    let metrics = face.metrics();
    let block = TextBlock {
        width: extent.width,
        height: extent.height,
        ascent: metrics.ascent,
        descent: metrics.descent,
    };

    let origin = anchor(
        config.position,
        src.width(),
        src.height(),
        block,
        config.offset_x,
        config.offset_y,
    );
    debug!(family = face.family(), ?origin, ?block, "drawing watermark");

    let mut dst = src.clone();
    face.draw(&mut dst, config.color, origin, &config.text);
    Ok(dst)
}
