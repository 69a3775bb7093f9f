//! Chainable, thread-safe image processor.
//!
//! A [`Processor`] holds one image and the first error any operation
//! produced. Operations take `&self`, so a processor can be shared between
//! threads behind an `Arc` and still be chained:
//!
//! ```rust
//! use piq::{PixelBuffer, Processor};
//!
//! let p = Processor::new(PixelBuffer::filled(400, 300, [90, 160, 220, 255]));
//! p.resize(200, 150).crop(50, 25, 100, 100).grayscale_fast();
//!
//! let image = p.image().unwrap();
//! assert_eq!(image.dimensions(), (100, 100));
//! ```
//!
//! # Error Latching
//!
//! The first failing operation moves the processor into a failed state.
//! Every later operation is skipped, and every accessor returns that same
//! error (the same `Arc`). The last good image stays reachable through
//! [`Processor::snapshot`].
//!
//! # Locking
//!
//! One `RwLock` guards the state. Transforms hold the write lock for their
//! whole duration; `image`, `snapshot`, `last_error` and `to_bytes` take the
//! read lock. Buffers are immutable once published, so readers may keep the
//! `Arc<PixelBuffer>` they were given while later transforms run.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use piq_core::PixelBuffer;
use piq_io::ImageFormat;
use piq_ops::{Filter, PerformanceConfig, WatermarkConfig, WatermarkOption};
use tracing::{debug, trace};

use crate::{Error, Result};

#[derive(Clone)]
enum State {
    Ready(Arc<PixelBuffer>),
    Failed {
        error: Arc<Error>,
        image: Option<Arc<PixelBuffer>>,
    },
}

#[derive(Clone)]
struct Inner {
    state: State,
    config: PerformanceConfig,
}

/// Fluent image processor with a sticky first error.
pub struct Processor {
    inner: RwLock<Inner>,
}

impl Processor {
    /// Creates a processor with the default [`PerformanceConfig`].
    ///
    /// `None` yields a processor that has already failed with
    /// [`Error::NilInput`].
    pub fn new(image: impl Into<Option<PixelBuffer>>) -> Self {
        Self::with_performance(image, PerformanceConfig::default())
    }

    /// Creates a processor with an explicit [`PerformanceConfig`].
    pub fn with_performance(image: impl Into<Option<PixelBuffer>>, config: PerformanceConfig) -> Self {
        let state = match image.into() {
            Some(image) => State::Ready(Arc::new(image)),
            None => State::Failed {
                error: Arc::new(Error::NilInput),
                image: None,
            },
        };
        Self::from_state(state, config)
    }

    /// Decodes an encoded image (PNG, JPEG or GIF, detected from content).
    ///
    /// An empty slice latches [`Error::EmptyInput`]; undecodable data latches
    /// [`Error::Decode`].
    pub fn from_bytes(data: &[u8]) -> Self {
        let state = match piq_io::decode(data) {
            Ok(image) => State::Ready(Arc::new(image)),
            Err(e) => {
                let error = Error::from(e);
                debug!(error = %error, len = data.len(), "failed to decode input");
                State::Failed {
                    error: Arc::new(error),
                    image: None,
                }
            }
        };
        Self::from_state(state, PerformanceConfig::default())
    }

    /// Reads and decodes an image file.
    ///
    /// A read failure latches [`Error::Io`]; otherwise behaves like
    /// [`Processor::from_bytes`].
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(data) => Self::from_bytes(&data),
            Err(source) => Self::from_state(
                State::Failed {
                    error: Arc::new(Error::Io {
                        path: path.to_path_buf(),
                        source,
                    }),
                    image: None,
                },
                PerformanceConfig::default(),
            ),
        }
    }

    fn from_state(state: State, config: PerformanceConfig) -> Self {
        Self {
            inner: RwLock::new(Inner { state, config }),
        }
    }

    // State is only replaced after a transform succeeds, so a poisoned lock
    // still guards a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current image, or the latched error.
    pub fn image(&self) -> Result<Arc<PixelBuffer>> {
        match &self.read().state {
            State::Ready(image) => Ok(Arc::clone(image)),
            State::Failed { error, .. } => Err(Arc::clone(error)),
        }
    }

    /// Image and error read under one lock acquisition.
    ///
    /// After a failure the image is the last one that was good, if any.
    pub fn snapshot(&self) -> (Option<Arc<PixelBuffer>>, Option<Arc<Error>>) {
        match &self.read().state {
            State::Ready(image) => (Some(Arc::clone(image)), None),
            State::Failed { error, image } => (image.clone(), Some(Arc::clone(error))),
        }
    }

    /// The latched error, if any.
    pub fn last_error(&self) -> Option<Arc<Error>> {
        match &self.read().state {
            State::Ready(_) => None,
            State::Failed { error, .. } => Some(Arc::clone(error)),
        }
    }

    /// Returns `true` until an operation fails.
    pub fn is_ok(&self) -> bool {
        matches!(self.read().state, State::Ready(_))
    }

    /// Current performance settings.
    pub fn performance_config(&self) -> PerformanceConfig {
        self.read().config
    }

    /// Encodes the current image.
    ///
    /// Returns the latched error unchanged if the processor has failed.
    pub fn to_bytes(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let inner = self.read();
        let image = match &inner.state {
            State::Ready(image) => image,
            State::Failed { error, .. } => return Err(Arc::clone(error)),
        };
        piq_io::encode(image, format).map_err(|source| {
            debug!(%format, error = %source, "encode failed");
            Arc::new(Error::Encode { format, source })
        })
    }

    /// Encodes the current image and writes it to `path`.
    ///
    /// Nothing is written if encoding fails.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: ImageFormat) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(format)?;
        std::fs::write(path, bytes).map_err(|source| {
            Arc::new(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        })
    }

    // ========================================================================
    // Chainable operations
    // ========================================================================

    /// Replaces the performance settings. Applies even after a failure.
    pub fn set_performance_config(&self, config: PerformanceConfig) -> &Self {
        self.write().config = config;
        self
    }

    /// Crops to the `w` x `h` rectangle at (`x`, `y`).
    pub fn crop(&self, x: i32, y: i32, w: i32, h: i32) -> &Self {
        self.apply("crop", |image, _| Ok(piq_ops::crop(image, x, y, w, h)?))
    }

    /// Resizes to exactly `width` x `height` with the default filter.
    pub fn resize(&self, width: i32, height: i32) -> &Self {
        self.resize_with(width, height, Filter::default())
    }

    /// Resizes to exactly `width` x `height` with `filter`.
    pub fn resize_with(&self, width: i32, height: i32, filter: Filter) -> &Self {
        self.apply("resize", |image, _| Ok(piq_ops::resize(image, width, height, filter)?))
    }

    /// Rec.709 grayscale on the calling thread.
    pub fn grayscale(&self) -> &Self {
        self.apply("grayscale", |image, _| Ok(piq_ops::grayscale(image)))
    }

    /// Rec.709 grayscale, strip-parallel when the image is large enough.
    ///
    /// Produces exactly the same pixels as [`Processor::grayscale`].
    pub fn grayscale_fast(&self) -> &Self {
        self.apply("grayscale_fast", |image, config| Ok(piq_ops::grayscale_auto(image, config)))
    }

    /// Draws `text` using default settings adjusted by `options`.
    pub fn add_text_watermark(&self, text: &str, options: impl IntoIterator<Item = WatermarkOption>) -> &Self {
        let config = WatermarkConfig::from_options(text, options);
        self.add_text_watermark_with(&config)
    }

    /// Draws a watermark described by `config`.
    pub fn add_text_watermark_with(&self, config: &WatermarkConfig) -> &Self {
        self.apply("add_text_watermark", |image, _| {
            Ok(piq_ops::add_text_watermark(image, config)?)
        })
    }

    /// Runs `op` on the current image under the write lock.
    fn apply<F>(&self, name: &'static str, op: F) -> &Self
    where
        F: FnOnce(&PixelBuffer, &PerformanceConfig) -> std::result::Result<PixelBuffer, Error>,
    {
        let mut inner = self.write();
        let current = match &inner.state {
            State::Ready(image) => Arc::clone(image),
            State::Failed { error, .. } => {
                trace!(op = name, %error, "skipping operation on failed processor");
                return self;
            }
        };

        match op(&current, &inner.config) {
            Ok(next) => {
                trace!(op = name, width = next.width(), height = next.height(), "operation applied");
                inner.state = State::Ready(Arc::new(next));
            }
            Err(error) => {
                debug!(op = name, %error, "operation failed, latching error");
                inner.state = State::Failed {
                    error: Arc::new(error),
                    image: Some(current),
                };
            }
        }
        self
    }
}

impl From<PixelBuffer> for Processor {
    fn from(image: PixelBuffer) -> Self {
        Self::new(image)
    }
}

/// Independent processor sharing the current image and error.
///
/// Neither the buffer nor the error is copied; later operations on either
/// processor do not affect the other.
impl Clone for Processor {
    fn clone(&self) -> Self {
        let inner = self.read();
        Self {
            inner: RwLock::new(inner.clone()),
        }
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        let mut s = f.debug_struct("Processor");
        match &inner.state {
            State::Ready(image) => s.field("image", image),
            State::Failed { error, image } => s.field("image", image).field("error", error),
        };
        s.field("config", &inner.config).finish()
    }
}
