//! Error types for kptrack.

use thiserror::Error;

/// Result alias for kptrack operations.
pub type KptResult<T> = std::result::Result<T, KptError>;

/// Errors that can occur when configuring or using kptrack containers and filters.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum KptError {
    /// A history buffer was requested with no slots.
    #[error("history capacity must be at least 1")]
    ZeroCapacity,
    /// Positional access past the live entries of a buffer.
    #[error("index {index} out of range for buffer of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Overlap threshold outside `[0, 1)` or not finite.
    #[error("overlap threshold {value} must be finite and within [0, 1)")]
    InvalidOverlapThreshold { value: f32 },
    /// A candidate carries a non-finite or negative attribute.
    #[error("invalid candidate: {reason}")]
    InvalidCandidate { reason: &'static str },
    /// A region of interest with an empty extent.
    #[error("invalid region of interest {width}x{height}")]
    InvalidRoi { width: u32, height: u32 },
}
