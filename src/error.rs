//! Error types for the landscape renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for landscape operations.
pub type Result<T> = std::result::Result<T, LandscapeError>;

/// Errors reported by initialization, asset loading and frame rendering.
///
/// Out-of-range point coordinates and out-of-range blur samples are never
/// errors; they are clipped and edge-sampled respectively.
#[derive(Debug, Error)]
pub enum LandscapeError {
    #[error("invalid output surface size {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    #[error("image size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("density ramp must be a 1xK or Kx1 strip, got {width}x{height}")]
    RampShape { width: u32, height: u32 },

    #[error("density ramp has no entries")]
    EmptyRamp,

    #[error("pixel data length {actual} does not match {width}x{height} RGBA ({expected} bytes)")]
    PixelData {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("point index {index} out of range (dataset has {len} points)")]
    PointIndex { index: usize, len: usize },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "png")]
    #[error("image error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
