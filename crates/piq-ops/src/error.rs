//! Error types for image operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Watermark text was empty.
    #[error("watermark text must not be empty")]
    EmptyText,

    /// Font bytes could not be parsed.
    #[error("failed to parse font: {0}")]
    FontParse(String),

    /// Font file could not be read.
    #[error("failed to read font file {}: {source}", path.display())]
    FontLoad {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying read error.
        #[source]
        source: io::Error,
    },

    /// A sized face could not be created from a parsed font.
    #[error("failed to create font face: {0}")]
    FaceCreation(String),

    /// Geometry or buffer error from the pixel model.
    #[error(transparent)]
    Core(#[from] piq_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
