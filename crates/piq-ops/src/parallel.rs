//! Strip-parallel grayscale using Rayon.
//!
//! The image is cut into horizontal strips, one per worker. Each worker owns
//! a disjoint `&mut` slice of the destination, so no synchronisation is needed
//! while pixels are written; the pool scope is the only join point.
//!
//! # Example
//!
//! ```rust
//! use piq_core::PixelBuffer;
//! use piq_ops::grayscale::grayscale;
//! use piq_ops::parallel::grayscale_parallel;
//!
//! let src = PixelBuffer::filled(64, 33, [12, 200, 99, 255]);
//! assert_eq!(grayscale_parallel(&src, 4), grayscale(&src));
//! ```

use crate::grayscale::{grayscale, grayscale_rows};
use piq_core::PixelBuffer;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// Default pixel count below which the parallel path is not worth its setup.
pub const DEFAULT_MIN_PARALLEL_PIXELS: usize = 100 * 100;

/// Number of hardware threads, falling back to 1 when unknown.
pub fn hardware_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Tuning for the parallel engine.
///
/// # Example
///
/// ```rust
/// use piq_ops::parallel::PerformanceConfig;
///
/// let cfg = PerformanceConfig::default()
///     .with_max_workers(2)
///     .with_min_parallel_pixels(0);
/// assert!(cfg.should_parallelize(1, 1));
/// assert_eq!(cfg.effective_workers(1), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PerformanceConfig {
    /// Worker count; 0 means one per hardware thread.
    pub max_workers: usize,
    /// Whether `grayscale_fast` may use the parallel engine at all.
    pub parallel: bool,
    /// Images with fewer pixels than this run sequentially.
    pub min_parallel_pixels: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_workers: hardware_threads(),
            parallel: true,
            min_parallel_pixels: DEFAULT_MIN_PARALLEL_PIXELS,
        }
    }
}

impl PerformanceConfig {
    /// Config that always runs on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the worker count (0 = hardware threads).
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    /// Enables or disables the parallel engine.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the parallel threshold in pixels.
    pub fn with_min_parallel_pixels(mut self, pixels: usize) -> Self {
        self.min_parallel_pixels = pixels;
        self
    }

    /// Workers actually used for an image with `rows` rows.
    ///
    /// Resolves 0 to the hardware thread count, then clamps to `rows` so no
    /// worker gets an empty strip. Returns 0 only when `rows` is 0.
    pub fn effective_workers(&self, rows: u32) -> usize {
        resolve_workers(self.max_workers, rows)
    }

    /// Returns `true` if an image of this size takes the parallel path.
    pub fn should_parallelize(&self, width: u32, height: u32) -> bool {
        self.parallel && (width as usize).saturating_mul(height as usize) >= self.min_parallel_pixels
    }
}

fn resolve_workers(requested: usize, rows: u32) -> usize {
    let workers = if requested == 0 { hardware_threads() } else { requested };
    workers.min(rows as usize)
}

/// A contiguous run of rows assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip {
    /// Worker index, also the strip's position from the top.
    pub index: usize,
    /// First row.
    pub start: u32,
    /// Row count (never zero).
    pub rows: u32,
}

/// Splits `height` rows into `workers` strips.
///
/// Every strip gets `height / workers` rows and the last one also takes the
/// remainder. Strips are ordered, gap-free and non-overlapping. `workers` is
/// clamped to `1..=height`; a zero height yields no strips.
///
/// ```rust
/// use piq_ops::parallel::plan_strips;
///
/// let strips = plan_strips(10, 3);
/// let rows: Vec<u32> = strips.iter().map(|s| s.rows).collect();
/// assert_eq!(rows, vec![3, 3, 4]);
/// ```
pub fn plan_strips(height: u32, workers: usize) -> Vec<Strip> {
    if height == 0 {
        return Vec::new();
    }
    let n = workers.clamp(1, height as usize) as u32;
    let base = height / n;
    (0..n)
        .map(|i| Strip {
            index: i as usize,
            start: i * base,
            rows: if i == n - 1 { height - i * base } else { base },
        })
        .collect()
}

/// Strip-parallel grayscale with `workers` threads (0 = hardware threads).
///
/// Builds a pool of exactly the resolved worker count for this call and
/// joins every strip before returning. If the pool cannot be built, the
/// strips run on the calling thread instead. Output is byte-identical to
/// [`grayscale`] in every case.
pub fn grayscale_parallel(src: &PixelBuffer, workers: usize) -> PixelBuffer {
    let (width, height) = src.dimensions();
    let n = resolve_workers(workers, height);
    if width == 0 || n <= 1 {
        return grayscale(src);
    }

    let strips = plan_strips(height, n);
    let mut dst = PixelBuffer::new(width, height);
    let stride = dst.stride();

    // Carve the destination into one disjoint slice per strip
    let mut chunks = Vec::with_capacity(strips.len());
    let mut rest = dst.data_mut();
    for strip in &strips {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(strip.rows as usize * stride);
        chunks.push((strip.start, head));
        rest = tail;
    }

    debug!(width, height, workers = strips.len(), "parallel grayscale");

    match rayon::ThreadPoolBuilder::new()
        .num_threads(strips.len())
        .thread_name(|index| format!("piq-grayscale-{index}"))
        .build()
    {
        Ok(pool) => pool.scope(|scope| {
            for (start, chunk) in chunks {
                scope.spawn(move |_| grayscale_rows(src, start, chunk, stride));
            }
        }),
        Err(e) => {
            warn!("failed to build grayscale pool, running strips inline: {e}");
            for (start, chunk) in chunks {
                grayscale_rows(src, start, chunk, stride);
            }
        }
    }

    dst
}

/// Grayscale through whichever engine `config` selects.
///
/// Parallel only when [`PerformanceConfig::should_parallelize`] holds,
/// sequential otherwise.
pub fn grayscale_auto(src: &PixelBuffer, config: &PerformanceConfig) -> PixelBuffer {
    let (width, height) = src.dimensions();
    if config.should_parallelize(width, height) {
        grayscale_parallel(src, config.max_workers)
    } else {
        debug!(width, height, parallel = config.parallel, "sequential grayscale");
        grayscale(src)
    }
}
