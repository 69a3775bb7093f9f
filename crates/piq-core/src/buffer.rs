//! RGBA8 pixel buffer.
//!
//! [`PixelBuffer`] is the unit every piq transform reads and writes: a
//! rectangular array of interleaved 8-bit R, G, B, A samples.
//!
//! # Memory Layout
//!
//! Rows are stored top-to-bottom, `stride` bytes apart. A row may carry
//! padding after its `width * 4` meaningful bytes:
//!
//! ```text
//! Memory: [R G B A R G B A ... pad]  ← Row 0 (stride bytes)
//!         [R G B A R G B A ... pad]  ← Row 1
//!         ...
//! ```
//!
//! Pixel (x, y) lives at `data[y * stride + x * 4 .. + 4]`.
//!
//! # Usage
//!
//! ```rust
//! use piq_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::new(64, 32);
//! assert_eq!(buf.pixel(0, 0), [0, 0, 0, 0]); // transparent black
//!
//! buf.set_pixel(10, 5, [255, 128, 0, 255]);
//! assert_eq!(buf.pixel(10, 5), [255, 128, 0, 255]);
//! ```
//!
//! # Sharing
//!
//! Transforms never mutate a buffer once it is handed to a reader; they
//! allocate a new destination instead. That is what lets the processor share
//! one buffer between clones behind an `Arc` without copying it.

use crate::{Error, Rect, Result};
use std::borrow::Cow;

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Owned RGBA8 raster with an explicit row stride.
///
/// # Invariants
///
/// - `stride >= width * 4`
/// - `data.len() == stride * height`
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Pixel data, `stride * height` bytes
    data: Vec<u8>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Bytes per row (may include padding)
    stride: usize,
}

impl PixelBuffer {
    /// Creates a zero-initialised buffer (transparent black) with a tight stride.
    ///
    /// ```rust
    /// use piq_core::PixelBuffer;
    ///
    /// let buf = PixelBuffer::new(1920, 1080);
    /// assert_eq!(buf.stride(), 1920 * 4);
    /// assert_eq!(buf.data().len(), 1920 * 1080 * 4);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the buffer cannot be allocated. Use [`PixelBuffer::try_new`]
    /// for sizes that come from callers.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width as usize * CHANNELS;
        Self {
            data: vec![0; stride * height as usize],
            width,
            height,
            stride,
        }
    }

    /// Fallible [`PixelBuffer::new`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooLarge`] if `width * height * 4` overflows or the
    /// allocation is refused.
    ///
    /// ```rust
    /// use piq_core::PixelBuffer;
    ///
    /// assert!(PixelBuffer::try_new(16, 16).is_ok());
    /// assert!(PixelBuffer::try_new(u32::MAX, u32::MAX).is_err());
    /// ```
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let too_large = || Error::TooLarge { width, height };
        let stride = (width as usize).checked_mul(CHANNELS).ok_or_else(too_large)?;
        let len = stride
            .checked_mul(height as usize)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or_else(too_large)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.resize(len, 0);
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Creates a buffer with every pixel set to `pixel`.
    ///
    /// ```rust
    /// use piq_core::PixelBuffer;
    ///
    /// let red = PixelBuffer::filled(4, 4, [255, 0, 0, 255]);
    /// assert_eq!(red.pixel(3, 3), [255, 0, 0, 255]);
    /// ```
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * CHANNELS);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
            stride: width as usize * CHANNELS,
        }
    }

    /// Wraps tightly packed RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw_with_stride(width, height, width as usize * CHANNELS, data)
    }

    /// Wraps RGBA bytes whose rows are `stride` bytes apart.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStride`] if `stride < width * 4`
    /// - [`Error::BufferSize`] if `data.len() != stride * height`
    ///
    /// ```rust
    /// use piq_core::PixelBuffer;
    ///
    /// // 2x2 image, each row padded to 12 bytes
    /// let data = vec![
    ///     1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0,
    ///     9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0,
    /// ];
    /// let buf = PixelBuffer::from_raw_with_stride(2, 2, 12, data).unwrap();
    /// assert_eq!(buf.pixel(1, 1), [13, 14, 15, 16]);
    /// ```
    pub fn from_raw_with_stride(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Result<Self> {
        let min_stride = width as usize * CHANNELS;
        if stride < min_stride {
            return Err(Error::InvalidStride {
                stride,
                min_stride,
                width,
            });
        }
        let expected = stride * height as usize;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Converts packed RGB8 samples, setting alpha to 255.
    pub fn from_rgb8(width: u32, height: u32, rgb: &[u8]) -> Result<Self> {
        Self::expand(width, height, rgb, 3, |px| [px[0], px[1], px[2], 255])
    }

    /// Converts packed 8-bit luma samples, setting alpha to 255.
    pub fn from_gray8(width: u32, height: u32, gray: &[u8]) -> Result<Self> {
        Self::expand(width, height, gray, 1, |px| [px[0], px[0], px[0], 255])
    }

    /// Converts packed 8-bit luma + alpha samples.
    pub fn from_gray_alpha8(width: u32, height: u32, gray_alpha: &[u8]) -> Result<Self> {
        Self::expand(width, height, gray_alpha, 2, |px| [px[0], px[0], px[0], px[1]])
    }

    fn expand(
        width: u32,
        height: u32,
        src: &[u8],
        channels: usize,
        convert: impl Fn(&[u8]) -> [u8; 4],
    ) -> Result<Self> {
        let expected = width as usize * height as usize * channels;
        if src.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: src.len(),
            });
        }
        let data = src.chunks_exact(channels).flat_map(convert).collect();
        Self::from_raw(width, height, data)
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the stride (bytes per row).
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the number of meaningful bytes in a row (`width * 4`).
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns a rectangle covering the whole buffer.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the buffer has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the raw bytes, including any row padding.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the raw bytes mutably, including any row padding.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer and returns its raw bytes.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of pixel (x, y).
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * CHANNELS
    }

    /// Returns the pixel at (x, y).
    ///
    /// Callers keep coordinates inside the buffer; only debug builds check.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&pixel);
    }

    /// Returns the meaningful bytes of row `y` (padding excluded).
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Returns the meaningful bytes of row `y` mutably.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.stride;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [u8; 4])> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Copies `src_rect` of `src` into this buffer with its top-left at (dst_x, dst_y).
    ///
    /// Both buffers may have different strides; the copy is done row by row.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if the source rectangle is not inside `src` or the
    /// destination rectangle is not inside `self`.
    ///
    /// ```rust
    /// use piq_core::{PixelBuffer, Rect};
    ///
    /// let mut src = PixelBuffer::new(8, 8);
    /// src.set_pixel(3, 2, [9, 9, 9, 9]);
    ///
    /// let mut dst = PixelBuffer::new(4, 4);
    /// dst.copy_region(&src, Rect::new(2, 2, 4, 4), 0, 0).unwrap();
    /// assert_eq!(dst.pixel(1, 0), [9, 9, 9, 9]);
    /// ```
    pub fn copy_region(&mut self, src: &PixelBuffer, src_rect: Rect, dst_x: u32, dst_y: u32) -> Result<()> {
        if !src.bounds().contains_rect(&src_rect) {
            return Err(Error::out_of_bounds("copy", src_rect, src.bounds()));
        }
        let dst_rect = Rect::new(dst_x as i32, dst_y as i32, src_rect.width, src_rect.height);
        if dst_x > i32::MAX as u32 || dst_y > i32::MAX as u32 || !self.bounds().contains_rect(&dst_rect) {
            return Err(Error::out_of_bounds("copy", dst_rect, self.bounds()));
        }

        let len = src_rect.width as usize * CHANNELS;
        for row in 0..src_rect.height {
            let s = src.offset(src_rect.x as u32, src_rect.y as u32 + row);
            let d = self.offset(dst_x, dst_y + row);
            self.data[d..d + len].copy_from_slice(&src.data[s..s + len]);
        }
        Ok(())
    }

    /// Returns the pixels tightly packed (`stride == width * 4`).
    ///
    /// Borrows when the buffer is already tight.
    pub fn to_packed(&self) -> Cow<'_, [u8]> {
        if self.stride == self.row_bytes() {
            return Cow::Borrowed(&self.data);
        }
        let mut packed = Vec::with_capacity(self.pixel_count() * CHANNELS);
        for y in 0..self.height {
            packed.extend_from_slice(self.row(y));
        }
        Cow::Owned(packed)
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}
