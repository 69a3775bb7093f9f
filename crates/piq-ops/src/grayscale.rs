//! Sequential Rec.709 grayscale.
//!
//! [`grayscale_rows`] is the single per-row kernel. The sequential path runs
//! it over the whole image; the strip-parallel path in [`crate::parallel`]
//! runs it once per strip, so both produce identical bytes.

use piq_core::{luminance_rec709_u8, PixelBuffer, CHANNELS};

/// Converts consecutive source rows into a destination strip.
///
/// `dst` holds whole destination rows `dst_stride` bytes apart; row `i` of
/// `dst` receives source row `first_row + i`. Alpha is copied unchanged.
///
/// # Panics
///
/// Panics if the strip extends past the last source row.
pub fn grayscale_rows(src: &PixelBuffer, first_row: u32, dst: &mut [u8], dst_stride: usize) {
    if dst_stride == 0 {
        return;
    }
    let row_bytes = src.row_bytes();
    for (i, dst_row) in dst.chunks_exact_mut(dst_stride).enumerate() {
        let src_row = src.row(first_row + i as u32);
        for (s, d) in src_row
            .chunks_exact(CHANNELS)
            .zip(dst_row[..row_bytes].chunks_exact_mut(CHANNELS))
        {
            let y = luminance_rec709_u8(s[0], s[1], s[2]);
            d.copy_from_slice(&[y, y, y, s[3]]);
        }
    }
}

/// Returns a grayscale copy of `src` on the calling thread.
///
/// ```rust
/// use piq_core::PixelBuffer;
/// use piq_ops::grayscale::grayscale;
///
/// let src = PixelBuffer::filled(2, 2, [100, 150, 200, 77]);
/// let gray = grayscale(&src);
/// assert_eq!(gray.pixel(1, 1), [143, 143, 143, 77]);
/// ```
pub fn grayscale(src: &PixelBuffer) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width(), src.height());
    let stride = dst.stride();
    grayscale_rows(src, 0, dst.data_mut(), stride);
    dst
}
