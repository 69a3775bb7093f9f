//! Geometric transformation operations.
//!
//! # Operations
//!
//! - [`crop`] - Extract region of interest

use crate::OpsResult;
use piq_core::{Error, PixelBuffer, Rect};

/// Crops a region from the image.
///
/// The result is a new buffer of exactly `w` x `h` whose pixel (0, 0) is
/// source pixel (`x`, `y`).
///
/// # Errors
///
/// - [`Error::InvalidDimensions`] if `w <= 0` or `h <= 0`
/// - [`Error::OutOfBounds`] if the rectangle is not inside the source
///
/// # Example
///
/// ```rust
/// use piq_core::PixelBuffer;
/// use piq_ops::transform::crop;
///
/// let mut src = PixelBuffer::new(64, 64);
/// src.set_pixel(10, 12, [1, 2, 3, 4]);
///
/// let cropped = crop(&src, 10, 12, 20, 20).unwrap();
/// assert_eq!(cropped.dimensions(), (20, 20));
/// assert_eq!(cropped.pixel(0, 0), [1, 2, 3, 4]);
/// ```
pub fn crop(src: &PixelBuffer, x: i32, y: i32, w: i32, h: i32) -> OpsResult<PixelBuffer> {
    if w <= 0 || h <= 0 {
        return Err(Error::invalid_dimensions("crop", w as i64, h as i64).into());
    }

    let rect = Rect::new(x, y, w as u32, h as u32);
    if !src.bounds().contains_rect(&rect) {
        return Err(Error::out_of_bounds("crop", rect, src.bounds()).into());
    }

    let mut dst = PixelBuffer::try_new(rect.width, rect.height)?;
    dst.copy_region(src, rect, 0, 0)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;

    fn numbered(width: u32, height: u32) -> PixelBuffer {
        let mut image = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                image.set_pixel(x, y, [x as u8, y as u8, (x + y) as u8, 255]);
            }
        }
        image
    }

    #[test]
    fn test_crop_copies_region() {
        let src = numbered(100, 80);
        let out = crop(&src, 10, 20, 30, 40).unwrap();

        assert_eq!(out.dimensions(), (30, 40));
        for y in 0..40 {
            for x in 0..30 {
                assert_eq!(out.pixel(x, y), src.pixel(x + 10, y + 20));
            }
        }
    }

    #[test]
    fn test_crop_full_image() {
        let src = numbered(7, 5);
        assert_eq!(crop(&src, 0, 0, 7, 5).unwrap(), src);
    }

    #[test]
    fn test_crop_non_positive_size() {
        let src = numbered(10, 10);
        for (w, h) in [(0, 5), (5, 0), (-1, 5), (5, -3)] {
            match crop(&src, 0, 0, w, h) {
                Err(OpsError::Core(e)) => assert!(e.is_dimension_error()),
                other => panic!("expected dimension error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let src = numbered(200, 150);
        let err = crop(&src, 150, 0, 100, 50).unwrap_err();
        match &err {
            OpsError::Core(e) => assert!(e.is_bounds_error()),
            other => panic!("expected bounds error, got {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("Rect(150, 0, 100x50)"), "{msg}");
        assert!(msg.contains("Rect(0, 0, 200x150)"), "{msg}");

        assert!(crop(&src, -1, 0, 10, 10).is_err());
        assert!(crop(&src, 0, 141, 10, 10).is_err());
    }
}
