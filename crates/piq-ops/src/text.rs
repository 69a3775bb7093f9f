//! Text shaping and rasterization using cosmic-text.
//!
//! - [`parse_font`] validates raw TTF/OTF bytes into a [`Font`]
//! - [`TextFace`] is a font at a given point size and DPI
//! - [`TextFace::measure`] reports the laid-out extent of a string
//! - [`TextFace::draw`] blends glyph coverage into a [`PixelBuffer`]
//!
//! Faces built from caller-supplied fonts own a private `FontSystem`; the
//! host's sans-serif face goes through one process-wide `FontSystem` that is
//! loaded on first use.
//!
//! # Example
//!
//! ```ignore
//! use piq_ops::text::{parse_font, TextFace};
//!
//! let font = parse_font(&std::fs::read("DejaVuSans.ttf")?)?;
//! let mut face = TextFace::new(&font, 24.0, 72.0)?;
//! let extent = face.measure("Hello");
//! face.draw(&mut image, [255, 255, 255, 128], (10, 40), "Hello");
//! ```

use cosmic_text::fontdb;
use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};
use piq_core::PixelBuffer;

// Scanning system fonts is expensive; do it once per process
lazy_static::lazy_static! {
    static ref FONT_SYSTEM: Mutex<FontSystem> = Mutex::new(FontSystem::new());
}

const LOCALE: &str = "en-US";

/// A parsed font, ready to be sized into a [`TextFace`].
#[derive(Clone)]
pub struct Font {
    db: fontdb::Database,
    family: String,
}

impl Font {
    /// Family name of the first face in the font data.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Number of faces the data contained (collections hold several).
    pub fn face_count(&self) -> usize {
        self.db.len()
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.family)
            .field("faces", &self.db.len())
            .finish()
    }
}

/// Parses TTF/OTF/TTC bytes.
///
/// # Errors
///
/// [`OpsError::FontParse`] if the data holds no usable face.
pub fn parse_font(bytes: &[u8]) -> OpsResult<Font> {
    let mut db = fontdb::Database::new();
    db.load_font_data(bytes.to_vec());

    let family = db
        .faces()
        .next()
        .ok_or_else(|| OpsError::FontParse(format!("no font faces found in {} bytes", bytes.len())))?
        .families
        .first()
        .map(|(name, _)| name.clone())
        .ok_or_else(|| OpsError::FontParse("font face has no family name".into()))?;

    trace!(%family, faces = db.len(), "parsed font");
    Ok(Font { db, family })
}

/// Vertical metrics of a face, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    /// Distance from the baseline to the top of the tallest glyphs.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the lowest glyphs (positive).
    pub descent: f32,
    /// Extra spacing between lines.
    pub leading: f32,
}

impl FaceMetrics {
    /// Full line height: ascent + descent + leading.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// Laid-out size of a string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    /// Advance width of the widest line.
    pub width: f32,
    /// Line height of the face.
    pub height: f32,
}

enum FontSource {
    Owned(Box<FontSystem>),
    System,
}

/// Borrowed access to whichever `FontSystem` backs a face.
enum FontSystemRef<'a> {
    Owned(&'a mut FontSystem),
    Shared(MutexGuard<'static, FontSystem>),
}

impl Deref for FontSystemRef<'_> {
    type Target = FontSystem;

    fn deref(&self) -> &FontSystem {
        match self {
            FontSystemRef::Owned(fs) => fs,
            FontSystemRef::Shared(guard) => guard,
        }
    }
}

impl DerefMut for FontSystemRef<'_> {
    fn deref_mut(&mut self) -> &mut FontSystem {
        match self {
            FontSystemRef::Owned(fs) => fs,
            FontSystemRef::Shared(guard) => guard,
        }
    }
}

fn system_fonts() -> MutexGuard<'static, FontSystem> {
    FONT_SYSTEM.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A font at a fixed size, able to measure and draw text.
pub struct TextFace {
    source: FontSource,
    family: String,
    size_px: f32,
    metrics: FaceMetrics,
}

impl std::fmt::Debug for TextFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFace")
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl TextFace {
    /// Sizes a parsed font: `size` in points at `dpi` dots per inch.
    ///
    /// # Errors
    ///
    /// [`OpsError::FaceCreation`] if `size` or `dpi` is not a positive finite
    /// number, or the font has no face that can be rendered.
    pub fn new(font: &Font, size: f64, dpi: f64) -> OpsResult<Self> {
        let size_px = pixel_size(size, dpi)?;
        let mut fs = FontSystem::new_with_locale_and_db(LOCALE.to_string(), font.db.clone());
        let metrics = face_metrics(&mut fs, &font.family, size_px)?;
        Ok(Self {
            source: FontSource::Owned(Box::new(fs)),
            family: font.family.clone(),
            size_px,
            metrics,
        })
    }

    /// Sizes the host's default sans-serif face.
    ///
    /// # Errors
    ///
    /// [`OpsError::FaceCreation`] for a bad size/DPI, or if the host has no
    /// fonts installed.
    pub fn system(size: f64, dpi: f64) -> OpsResult<Self> {
        let size_px = pixel_size(size, dpi)?;
        let mut fs = system_fonts();

        let sans = fs.db().query(&regular(&[fontdb::Family::SansSerif]));
        let id = sans
            .or_else(|| fs.db().faces().next().map(|face| face.id))
            .ok_or_else(|| OpsError::FaceCreation("no system fonts available".into()))?;
        let family = fs
            .db()
            .face(id)
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| OpsError::FaceCreation("system font has no family name".into()))?;

        let metrics = face_metrics(&mut fs, &family, size_px)?;
        debug!(%family, size_px, "using system font");
        Ok(Self {
            source: FontSource::System,
            family,
            size_px,
            metrics,
        })
    }

    /// Family name this face renders with.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Em size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Vertical metrics in pixels.
    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn font_system(&mut self) -> FontSystemRef<'_> {
        match &mut self.source {
            FontSource::Owned(fs) => FontSystemRef::Owned(fs),
            FontSource::System => FontSystemRef::Shared(system_fonts()),
        }
    }

    /// Measures `text` laid out on a single baseline.
    ///
    /// The width is the horizontal extent of the rendered ink, not the sum
    /// of advances, so trailing spaces and side bearings do not count. Text
    /// with no ink measures zero wide. The height is the face's line height.
    pub fn measure(&mut self, text: &str) -> TextExtent {
        let family = self.family.clone();
        let (size_px, height) = (self.size_px, self.metrics.height());
        let mut fs = self.font_system();
        let buffer = layout(&mut fs, &family, size_px, height, text);

        let mut cache = SwashCache::new();
        let mut ink: Option<(i32, i32)> = None;
        buffer.draw(&mut fs, &mut cache, Color::rgb(0, 0, 0), |x, _, w, _, c| {
            if c.a() == 0 || w == 0 {
                return;
            }
            let (lo, hi) = (x, x + w as i32);
            ink = Some(ink.map_or((lo, hi), |(l, h)| (l.min(lo), h.max(hi))));
        });

        let width = ink.map_or(0.0, |(lo, hi)| (hi - lo) as f32);
        trace!(text, width, height, "measured text");
        TextExtent { width, height }
    }

    /// Draws `text` with its first baseline starting at `origin`.
    ///
    /// Glyph coverage scales the alpha of `color`, which is then blended
    /// source-over into `dst`. Pixels outside `dst` are clipped.
    pub fn draw(&mut self, dst: &mut PixelBuffer, color: [u8; 4], origin: (i32, i32), text: &str) {
        let family = self.family.clone();
        let (size_px, height) = (self.size_px, self.metrics.height());
        let mut fs = self.font_system();
        let buffer = layout(&mut fs, &family, size_px, height, text);

        let baseline = buffer.layout_runs().next().map(|run| run.line_y).unwrap_or(0.0);
        let dx = origin.0;
        let dy = origin.1 - baseline.round() as i32;
        let (width, height) = (dst.width() as i32, dst.height() as i32);

        // Fresh cache: glyph IDs are only unique within one font database
        let mut cache = SwashCache::new();
        let text_color = Color::rgba(color[0], color[1], color[2], color[3]);

        // The callback's alpha is bare glyph coverage; the base alpha is dropped
        buffer.draw(&mut fs, &mut cache, text_color, |x, y, w, h, c| {
            let src = coverage_color(color, c.a());
            if src[3] == 0 {
                return;
            }
            for py in (dy + y).max(0)..(dy + y + h as i32).min(height) {
                for px in (dx + x).max(0)..(dx + x + w as i32).min(width) {
                    let under = dst.pixel(px as u32, py as u32);
                    dst.set_pixel(px as u32, py as u32, blend_over(src, under));
                }
            }
        });
    }
}

fn pixel_size(size: f64, dpi: f64) -> OpsResult<f32> {
    if !size.is_finite() || size <= 0.0 {
        return Err(OpsError::FaceCreation(format!("font size must be positive, got {size}")));
    }
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(OpsError::FaceCreation(format!("dpi must be positive, got {dpi}")));
    }
    Ok((size * dpi / 72.0) as f32)
}

fn regular<'a>(families: &'a [fontdb::Family<'a>]) -> fontdb::Query<'a> {
    fontdb::Query {
        families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    }
}

fn face_metrics(fs: &mut FontSystem, family: &str, size_px: f32) -> OpsResult<FaceMetrics> {
    let id = fs
        .db()
        .query(&regular(&[fontdb::Family::Name(family)]))
        .ok_or_else(|| OpsError::FaceCreation(format!("no face found for family {family:?}")))?;
    let font = fs
        .get_font(id)
        .ok_or_else(|| OpsError::FaceCreation(format!("font {family:?} could not be loaded")))?;

    let m = font.as_swash().metrics(&[]).scale(size_px);
    Ok(FaceMetrics {
        ascent: m.ascent.abs(),
        descent: m.descent.abs(),
        leading: m.leading.max(0.0),
    })
}

fn layout(fs: &mut FontSystem, family: &str, size_px: f32, line_height: f32, text: &str) -> Buffer {
    let line_height = if line_height > 0.0 { line_height } else { size_px * 1.2 };
    let mut buffer = Buffer::new(fs, Metrics::new(size_px, line_height));
    buffer.set_size(fs, None, None);
    let attrs = Attrs::new().family(Family::Name(family));
    buffer.set_text(fs, text, &attrs, Shaping::Advanced);
    buffer.shape_until_scroll(fs, false);
    buffer
}

/// `color` with its alpha scaled by glyph `coverage`.
fn coverage_color(color: [u8; 4], coverage: u8) -> [u8; 4] {
    let a = (coverage as u16 * color[3] as u16 + 127) / 255;
    [color[0], color[1], color[2], a as u8]
}

/// Straight-alpha source-over.
fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_font(&[1, 2, 3, 4]), Err(OpsError::FontParse(_))));
        assert!(matches!(parse_font(&[]), Err(OpsError::FontParse(_))));
    }

    #[test]
    fn test_pixel_size() {
        assert_eq!(pixel_size(24.0, 72.0).unwrap(), 24.0);
        assert_eq!(pixel_size(12.0, 144.0).unwrap(), 24.0);
        for (size, dpi) in [(0.0, 72.0), (-1.0, 72.0), (12.0, 0.0), (f64::NAN, 72.0), (12.0, f64::INFINITY)] {
            assert!(matches!(pixel_size(size, dpi), Err(OpsError::FaceCreation(_))));
        }
    }

    #[test]
    fn test_blend_over() {
        // Opaque source replaces
        assert_eq!(blend_over([10, 20, 30, 255], [200, 200, 200, 255]), [10, 20, 30, 255]);
        // Transparent source keeps destination
        assert_eq!(blend_over([10, 20, 30, 0], [200, 100, 50, 255]), [200, 100, 50, 255]);
        // Half white over opaque black
        assert_eq!(blend_over([255, 255, 255, 128], [0, 0, 0, 255]), [128, 128, 128, 255]);
        // Anything over nothing
        assert_eq!(blend_over([0, 0, 0, 0], [0, 0, 0, 0]), [0, 0, 0, 0]);
    }

    #[test]
    fn test_coverage_scales_color_alpha() {
        assert_eq!(coverage_color([255, 255, 255, 128], 255), [255, 255, 255, 128]);
        assert_eq!(coverage_color([255, 255, 255, 128], 0), [255, 255, 255, 0]);
        assert_eq!(coverage_color([10, 20, 30, 255], 100), [10, 20, 30, 100]);
        assert_eq!(coverage_color([10, 20, 30, 128], 128), [10, 20, 30, 64]);
    }

    #[test]
    fn test_half_alpha_draw_stays_half_bright() {
        let mut face = match TextFace::system(24.0, 72.0) {
            Ok(face) => face,
            Err(e) => {
                eprintln!("Skipping test: no system font ({e})");
                return;
            }
        };

        let mut image = PixelBuffer::filled(120, 40, [0, 0, 0, 255]);
        face.draw(&mut image, [255, 255, 255, 128], (4, 30), "ilpq");

        let brightest = image.pixels().map(|(_, _, px)| px[0]).max().unwrap_or(0);
        assert!(brightest > 0, "nothing drawn");
        assert!(brightest <= 129, "glyph core ignored color alpha: {brightest}");
        assert!(image.pixels().all(|(_, _, px)| px[3] == 255));
    }

    #[test]
    fn test_measure_matches_drawn_ink() {
        let mut face = match TextFace::system(24.0, 72.0) {
            Ok(face) => face,
            Err(e) => {
                eprintln!("Skipping test: no system font ({e})");
                return;
            }
        };

        let extent = face.measure("Hello");
        let mut image = PixelBuffer::filled(200, 40, [0, 0, 0, 255]);
        face.draw(&mut image, [255, 255, 255, 255], (20, 30), "Hello");

        let inked: Vec<u32> = image.pixels().filter(|(_, _, px)| px[0] > 0).map(|(x, _, _)| x).collect();
        let (lo, hi) = (inked.iter().min().copied().unwrap_or(0), inked.iter().max().copied().unwrap_or(0));
        assert_eq!(extent.width, (hi + 1 - lo) as f32);

        // Trailing spaces carry no ink
        assert_eq!(face.measure("Hello   ").width, extent.width);
        assert_eq!(face.measure("   ").width, 0.0);
    }

    #[test]
    fn test_face_metrics_height() {
        let m = FaceMetrics { ascent: 18.0, descent: 5.0, leading: 1.0 };
        assert_eq!(m.height(), 24.0);
    }
}
