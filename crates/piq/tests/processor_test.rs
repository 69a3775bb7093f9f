//! Processor behavior: transforms, error latching, codecs.

use std::sync::Arc;

use piq::{ErrorKind, Filter, ImageFormat, PerformanceConfig, PixelBuffer, Processor};

/// Gradient test image where every pixel is distinct.
fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let px = [(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) * 3 % 256) as u8, 255 - (x % 64) as u8];
            img.set_pixel(x, y, px);
        }
    }
    img
}

// ============================================================================
// Crop
// ============================================================================

#[test]
fn test_crop_origin_maps_to_source() {
    let src = gradient(64, 48);
    let p = Processor::new(src.clone());
    p.crop(10, 5, 20, 30);

    let out = p.image().unwrap();
    assert_eq!(out.dimensions(), (20, 30));
    assert_eq!(out.pixel(0, 0), src.pixel(10, 5));
    assert_eq!(out.pixel(19, 29), src.pixel(29, 34));
}

#[test]
fn test_crop_full_image_is_identity() {
    let src = gradient(16, 9);
    let p = Processor::new(src.clone());
    p.crop(0, 0, 16, 9);
    assert_eq!(p.image().unwrap().to_packed(), src.to_packed());
}

#[test]
fn test_crop_out_of_bounds() {
    let p = Processor::new(PixelBuffer::filled(200, 150, [1, 2, 3, 255]));
    p.crop(150, 0, 100, 50);

    let err = p.last_error().unwrap();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert!(err.to_string().contains("Rect(150, 0, 100x50)"), "message: {err}");

    let (image, _) = p.snapshot();
    assert_eq!(image.unwrap().dimensions(), (200, 150));
}

#[test]
fn test_crop_negative_origin_out_of_bounds() {
    let p = Processor::new(PixelBuffer::new(10, 10));
    p.crop(-1, 0, 5, 5);
    assert_eq!(p.last_error().unwrap().kind(), ErrorKind::OutOfBounds);
}

// ============================================================================
// Non-positive dimensions
// ============================================================================

#[test]
fn test_non_positive_sizes_latch_invalid_dimensions() {
    let cases: [(&str, fn(&Processor)); 5] = [
        ("crop zero width", |p| {
            p.crop(0, 0, 0, 5);
        }),
        ("crop negative height", |p| {
            p.crop(0, 0, 5, -2);
        }),
        ("resize zero", |p| {
            p.resize(0, 10);
        }),
        ("resize negative", |p| {
            p.resize(10, -10);
        }),
        ("resize both", |p| {
            p.resize_with(-1, 0, Filter::Nearest);
        }),
    ];

    for (name, op) in cases {
        let src = gradient(12, 8);
        let p = Processor::new(src.clone());
        op(&p);

        let (image, error) = p.snapshot();
        assert_eq!(error.unwrap().kind(), ErrorKind::InvalidDimensions, "{name}");
        let image = image.unwrap();
        assert_eq!(image.to_packed(), src.to_packed(), "{name}: buffer changed");
    }
}

#[test]
fn test_oversized_resize_latches_invalid_dimensions() {
    let src = gradient(12, 8);
    let p = Processor::new(src.clone());
    p.resize(i32::MAX, i32::MAX);

    let (image, error) = p.snapshot();
    assert_eq!(error.unwrap().kind(), ErrorKind::InvalidDimensions);
    assert_eq!(image.unwrap().to_packed(), src.to_packed());
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_exact_dimensions() {
    let p = Processor::new(gradient(40, 30));
    p.resize(13, 77);
    assert_eq!(p.image().unwrap().dimensions(), (13, 77));

    for filter in [Filter::Nearest, Filter::Bilinear, Filter::CatmullRom, Filter::Mitchell, Filter::Lanczos3] {
        let p = Processor::new(gradient(40, 30));
        p.resize_with(100, 1, filter);
        assert_eq!(p.image().unwrap().dimensions(), (100, 1), "{filter:?}");
    }
}

#[test]
fn test_resize_constant_stays_constant() {
    let p = Processor::new(PixelBuffer::filled(31, 17, [10, 200, 90, 255]));
    p.resize(64, 9);
    let out = p.image().unwrap();
    for (_, _, px) in out.pixels() {
        assert_eq!(px, [10, 200, 90, 255]);
    }
}

// ============================================================================
// Grayscale
// ============================================================================

#[test]
fn test_grayscale_channels_equal_and_alpha_kept() {
    let src = gradient(33, 21);
    let p = Processor::new(src.clone());
    p.grayscale();

    let out = p.image().unwrap();
    for (x, y, px) in out.pixels() {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], src.pixel(x, y)[3]);
    }
}

#[test]
fn test_grayscale_is_idempotent() {
    let p = Processor::new(gradient(20, 20));
    p.grayscale();
    let once = p.image().unwrap();
    p.grayscale();
    let twice = p.image().unwrap();
    assert_eq!(once.to_packed(), twice.to_packed());
}

#[test]
fn test_grayscale_fast_matches_sequential() {
    let src = gradient(257, 131);
    let seq = Processor::new(src.clone());
    seq.grayscale();
    let expected = seq.image().unwrap();

    for workers in [1, 2, 3, 8, 64] {
        let cfg = PerformanceConfig::default().with_max_workers(workers).with_min_parallel_pixels(0);
        let fast = Processor::with_performance(src.clone(), cfg);
        fast.grayscale_fast();
        assert_eq!(fast.image().unwrap().to_packed(), expected.to_packed(), "workers={workers}");
    }

    let off = Processor::with_performance(src, PerformanceConfig::sequential());
    off.grayscale_fast();
    assert_eq!(off.image().unwrap().to_packed(), expected.to_packed());
}

#[test]
fn test_set_performance_config_is_used() {
    let p = Processor::new(gradient(50, 50));
    let cfg = PerformanceConfig::default().with_max_workers(2).with_min_parallel_pixels(1);
    p.set_performance_config(cfg).grayscale_fast();
    assert_eq!(p.performance_config(), cfg);
    assert!(p.is_ok());
}

// ============================================================================
// Error latching
// ============================================================================

#[test]
fn test_first_error_wins() {
    let p = Processor::new(PixelBuffer::new(100, 100));
    p.crop(90, 90, 20, 20).resize(0, 0).crop(0, 0, -1, -1);

    let first = p.last_error().unwrap();
    assert_eq!(first.kind(), ErrorKind::OutOfBounds);

    p.grayscale().grayscale_fast().add_text_watermark("", []);
    let again = p.image().unwrap_err();
    assert!(Arc::ptr_eq(&first, &again));
    assert!(Arc::ptr_eq(&first, &p.to_bytes(ImageFormat::Png).unwrap_err()));
}

#[test]
fn test_nil_input() {
    let p = Processor::new(None);
    p.crop(0, 0, 1, 1).resize(5, 5).grayscale();
    assert_eq!(p.last_error().unwrap().kind(), ErrorKind::NilInput);
    assert_eq!(p.to_bytes(ImageFormat::Png).unwrap_err().kind(), ErrorKind::NilInput);
}

#[test]
fn test_clone_is_independent() {
    let a = Processor::new(gradient(30, 30));
    let b = a.clone();
    assert!(Arc::ptr_eq(&a.image().unwrap(), &b.image().unwrap()));

    b.resize(0, 1);
    assert!(a.is_ok());
    assert!(!b.is_ok());

    a.crop(0, 0, 10, 10);
    assert_eq!(a.image().unwrap().dimensions(), (10, 10));
    let (b_image, _) = b.snapshot();
    assert_eq!(b_image.unwrap().dimensions(), (30, 30));
}

#[test]
fn test_clone_shares_latched_error() {
    let a = Processor::new(None);
    let b = a.clone();
    assert!(Arc::ptr_eq(&a.last_error().unwrap(), &b.last_error().unwrap()));
}

#[test]
fn test_from_pixel_buffer() {
    let p: Processor = PixelBuffer::new(3, 4).into();
    assert_eq!(p.image().unwrap().dimensions(), (3, 4));
}

// ============================================================================
// Codecs
// ============================================================================

#[test]
fn test_png_round_trip_is_exact() {
    let src = gradient(37, 23);
    let png = Processor::new(src.clone()).to_bytes(ImageFormat::Png).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");

    let back = Processor::from_bytes(&png);
    assert_eq!(back.image().unwrap().to_packed(), src.to_packed());
}

#[test]
fn test_jpeg_round_trip_keeps_dimensions() {
    let p = Processor::new(gradient(45, 19));
    let jpeg = p.to_bytes(ImageFormat::Jpeg).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let back = Processor::from_bytes(&jpeg);
    let image = back.image().unwrap();
    assert_eq!(image.dimensions(), (45, 19));
    for (_, _, px) in image.pixels() {
        assert_eq!(px[3], 255);
    }
}

#[test]
fn test_from_bytes_empty() {
    let p = Processor::from_bytes(&[]);
    assert_eq!(p.last_error().unwrap().kind(), ErrorKind::EmptyInput);
    assert!(p.snapshot().0.is_none());
}

#[test]
fn test_from_bytes_garbage() {
    let p = Processor::from_bytes(b"definitely not an image");
    assert_eq!(p.last_error().unwrap().kind(), ErrorKind::DecodeFailure);

    let truncated_png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    let p = Processor::from_bytes(&truncated_png);
    assert_eq!(p.last_error().unwrap().kind(), ErrorKind::DecodeFailure);
}

#[test]
fn test_unsupported_encode_formats() {
    let p = Processor::new(PixelBuffer::new(4, 4));
    for format in [ImageFormat::Gif, ImageFormat::Unknown] {
        let err = p.to_bytes(format).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat, "{format:?}");
    }
    // Encode failures are returned, not latched.
    assert!(p.is_ok());
}

#[test]
fn test_chain_then_encode() {
    let p = Processor::new(gradient(200, 150));
    p.crop(10, 10, 120, 100).resize(60, 50).grayscale_fast();
    let png = p.to_bytes(ImageFormat::Png).unwrap();

    let back = Processor::from_bytes(&png).image().unwrap();
    assert_eq!(back.dimensions(), (60, 50));
    for (_, _, px) in back.pixels() {
        assert!(px[0] == px[1] && px[1] == px[2]);
    }
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");

    let src = gradient(21, 13);
    Processor::new(src.clone()).save(&path, ImageFormat::Png).unwrap();

    let back = Processor::open(&path);
    assert_eq!(back.image().unwrap().to_packed(), src.to_packed());
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = Processor::open(dir.path().join("missing.png"));
    let err = p.last_error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("missing.png"));
}

#[test]
fn test_save_unsupported_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.gif");

    let err = Processor::new(PixelBuffer::new(2, 2)).save(&path, ImageFormat::Gif).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert!(!path.exists());
}
