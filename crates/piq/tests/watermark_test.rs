//! Text watermark tests.
//!
//! Rendering tests need an installed font and are skipped on hosts without
//! one.

use std::path::PathBuf;

use piq::{
    with_color, with_dpi, with_font_bytes, with_font_path, with_font_size, with_offset, with_position, ErrorKind,
    PixelBuffer, Position, Processor, WatermarkConfig,
};
use piq_ops::text::TextFace;

const BLACK: [u8; 4] = [0, 0, 0, 255];

fn have_system_font() -> bool {
    match TextFace::system(24.0, 72.0) {
        Ok(_) => true,
        Err(e) => {
            eprintln!("Skipping test: no system font ({e})");
            false
        }
    }
}

fn font_file() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    let found = CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists());
    if found.is_none() {
        eprintln!("Skipping test: no known font file on this host");
    }
    found
}

/// Pixels in `[x0, x1) x [y0, y1)` that differ from `color`.
fn changed_in(image: &PixelBuffer, color: [u8; 4], x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    let mut n = 0;
    for y in y0..y1.min(image.height()) {
        for x in x0..x1.min(image.width()) {
            if image.pixel(x, y) != color {
                n += 1;
            }
        }
    }
    n
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_invalid_font_bytes() {
    let p = Processor::new(PixelBuffer::filled(100, 50, BLACK));
    p.add_text_watermark("hello", [with_font_bytes(vec![1u8, 2, 3, 4])]);

    let (image, error) = p.snapshot();
    assert_eq!(error.unwrap().kind(), ErrorKind::FontParseFailure);
    assert_eq!(changed_in(&image.unwrap(), BLACK, 0, 0, 100, 50), 0);
}

#[test]
fn test_missing_font_file() {
    let p = Processor::new(PixelBuffer::filled(10, 10, BLACK));
    p.add_text_watermark("hello", [with_font_path("/nonexistent/piq/font.ttf")]);
    let err = p.last_error().unwrap();
    assert_eq!(err.kind(), ErrorKind::FontParseFailure);
    assert!(err.to_string().contains("font.ttf"), "message: {err}");
}

#[test]
fn test_empty_text() {
    let p = Processor::new(PixelBuffer::filled(10, 10, BLACK));
    // Checked before the font is touched.
    p.add_text_watermark("", [with_font_bytes(vec![1u8, 2, 3, 4])]);
    assert_eq!(p.last_error().unwrap().kind(), ErrorKind::EmptyText);
}

#[test]
fn test_bad_size_or_dpi() {
    for option in [with_font_size(0.0), with_font_size(-3.0), with_dpi(0.0), with_dpi(f64::NAN)] {
        let p = Processor::new(PixelBuffer::filled(10, 10, BLACK));
        p.add_text_watermark("x", [option]);
        assert_eq!(p.last_error().unwrap().kind(), ErrorKind::FaceCreationFailure);
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_default_watermark_bottom_right() {
    if !have_system_font() {
        return;
    }

    let p = Processor::new(PixelBuffer::filled(300, 120, BLACK));
    p.add_text_watermark("piq", []);
    assert!(p.is_ok(), "{:?}", p.last_error());

    let image = p.image().unwrap();
    assert_eq!(image.dimensions(), (300, 120));
    assert!(changed_in(&image, BLACK, 150, 60, 300, 120) > 0, "nothing drawn bottom-right");
    assert_eq!(changed_in(&image, BLACK, 0, 0, 150, 60), 0, "ink outside the anchored corner");

    // White at half alpha over opaque black: gray, still opaque.
    for (_, _, px) in image.pixels() {
        assert_eq!(px[3], 255);
        assert!(px[0] <= 129, "too bright for 50% white: {px:?}");
    }
}

#[test]
fn test_positions() {
    if !have_system_font() {
        return;
    }

    let cases = [
        (Position::TopLeft, (0, 0, 200, 100)),
        (Position::TopRight, (200, 0, 400, 100)),
        (Position::BottomLeft, (0, 100, 200, 200)),
        (Position::BottomRight, (200, 100, 400, 200)),
        (Position::Center, (100, 50, 300, 150)),
    ];

    for (position, (x0, y0, x1, y1)) in cases {
        let p = Processor::new(PixelBuffer::filled(400, 200, BLACK));
        p.add_text_watermark("Ab", [with_position(position), with_color([255, 255, 255, 255])]);
        let image = p.image().unwrap();

        let total = changed_in(&image, BLACK, 0, 0, 400, 200);
        let inside = changed_in(&image, BLACK, x0, y0, x1, y1);
        assert!(total > 0, "{position:?}: nothing drawn");
        assert_eq!(inside, total, "{position:?}: ink outside expected region");
    }
}

#[test]
fn test_offset_moves_text() {
    if !have_system_font() {
        return;
    }

    let p = Processor::new(PixelBuffer::filled(300, 200, BLACK));
    p.add_text_watermark(
        "M",
        [with_position(Position::TopLeft), with_offset(150.0, 100.0), with_color([255, 0, 0, 255])],
    );
    let image = p.image().unwrap();
    assert_eq!(changed_in(&image, BLACK, 0, 0, 140, 95), 0);
    assert!(changed_in(&image, BLACK, 140, 95, 300, 200) > 0);
}

#[test]
fn test_text_off_canvas_is_clipped() {
    if !have_system_font() {
        return;
    }

    let p = Processor::new(PixelBuffer::filled(20, 20, BLACK));
    p.add_text_watermark("a long watermark that cannot fit", [with_font_size(48.0)]);
    assert!(p.is_ok(), "{:?}", p.last_error());
    assert_eq!(p.image().unwrap().dimensions(), (20, 20));
}

#[test]
fn test_font_from_file_and_bytes_match() {
    let Some(path) = font_file() else {
        return;
    };
    let bytes = std::fs::read(&path).unwrap();

    let by_path = Processor::new(PixelBuffer::filled(200, 80, BLACK));
    by_path.add_text_watermark("Hello", [with_font_path(path), with_font_size(30.0)]);
    let by_bytes = Processor::new(PixelBuffer::filled(200, 80, BLACK));
    by_bytes.add_text_watermark("Hello", [with_font_bytes(bytes), with_font_size(30.0)]);

    let a = by_path.image().unwrap();
    let b = by_bytes.image().unwrap();
    assert!(changed_in(&a, BLACK, 0, 0, 200, 80) > 0);
    assert_eq!(a.to_packed(), b.to_packed());
}

#[test]
fn test_watermark_in_chain_with_config() {
    if !have_system_font() {
        return;
    }

    let mut config = WatermarkConfig::new("(c) piq");
    config.position = Position::Center;
    config.color = [255, 255, 0, 200];

    let p = Processor::new(PixelBuffer::filled(640, 480, BLACK));
    p.resize(320, 240).add_text_watermark_with(&config).grayscale();
    assert!(p.is_ok(), "{:?}", p.last_error());

    let image = p.image().unwrap();
    assert!(changed_in(&image, BLACK, 0, 0, 320, 240) > 0);
    for (_, _, px) in image.pixels() {
        assert!(px[0] == px[1] && px[1] == px[2]);
    }
}
