//! Rec.709 luminance weighting for 8-bit RGBA pixels.
//!
//! Every grayscale path in piq (direct, strip-parallel, idempotence checks in
//! tests) goes through [`luminance_rec709_u8`], so the rounding rule is applied
//! once and identically everywhere.
//!
//! # Used By
//!
//! - `piq-ops::grayscale` - sequential row kernel
//! - `piq-ops::parallel` - strip workers share the same kernel

// ============================================================================
// Rec.709 Luminance Constants
// ============================================================================

/// Rec.709 luminance coefficient for red channel.
///
/// Used in the standard luminance formula: `Y = 0.2126*R + 0.7152*G + 0.0722*B`
pub const REC709_LUMA_R: f64 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f64 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f64 = 0.0722;

/// Rec.709 luminance coefficients as an array [R, G, B].
pub const REC709_LUMA: [f64; 3] = [REC709_LUMA_R, REC709_LUMA_G, REC709_LUMA_B];

/// Calculate the 8-bit Rec.709 luminance of an RGB triple.
///
/// `Y = round(0.2126*R + 0.7152*G + 0.0722*B)`, evaluated in `f64` and rounded
/// half away from zero. The weights sum to one, so an already-gray input maps
/// to itself and the result never exceeds 255.
///
/// # Example
/// ```
/// use piq_core::luminance_rec709_u8;
///
/// assert_eq!(luminance_rec709_u8(100, 150, 200), 143);
/// assert_eq!(luminance_rec709_u8(255, 255, 255), 255);
/// assert_eq!(luminance_rec709_u8(77, 77, 77), 77);
/// ```
#[inline]
pub fn luminance_rec709_u8(r: u8, g: u8, b: u8) -> u8 {
    let y = REC709_LUMA_R * r as f64 + REC709_LUMA_G * g as f64 + REC709_LUMA_B * b as f64;
    // `as` saturates, so 255.00000000000003 still lands on 255.
    y.round() as u8
}
