//! Error types for series distance analysis
//!
//! Provides a unified error type for all sd-* crates.

use thiserror::Error;

/// Core error type for series distance operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Observed and simulated segment counts cannot be equalized
    #[error(
        "Parity mismatch: {obs_segments} observed and {sim_segments} simulated segments differ by an odd number"
    )]
    ParityMismatch {
        obs_segments: usize,
        sim_segments: usize,
    },

    /// Aggregation needs at least two segments
    #[error("Too few segments: need at least 2 to aggregate, got {actual}")]
    TooFewSegments { actual: usize },

    /// First and last segments may only be removed when two segments are left
    #[error("Segment {index} is a boundary segment and cannot be removed while {segments} segments remain")]
    ProtectedBoundarySegment { index: usize, segments: usize },

    /// A series has no sample of the requested hydrological case
    #[error("No {case} sample found in {series} series")]
    NoFeatureFound {
        series: &'static str,
        case: &'static str,
    },

    /// Unsupported magnitude error model
    #[error("Unknown error model: {0}")]
    UnknownErrorModel(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a series shorter than two samples
    pub fn too_short(actual: usize) -> Self {
        Self::InvalidInput(format!("series needs at least 2 samples, got {actual}"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Whether the error is a structural precondition failure of the input
    /// series, as opposed to misuse of the aggregation API.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::ParityMismatch { .. }
                | Self::NoFeatureFound { .. }
        )
    }
}
