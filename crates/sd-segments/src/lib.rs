//! Hydrograph segmentation
//!
//! This crate turns a hydrograph into monotonic rise/fall segments and
//! provides the operations the coarse-graining search is built from.
//!
//! ## Operations
//!
//! - [`define_segments`]: split at every interior peak and valley and compute
//!   per-segment statistics and relevance
//! - [`trim_series`]: cut an observed/simulated pair so both start and end
//!   with the same case
//! - [`aggregate_segment`]: remove one segment by merging it into its
//!   neighbours, keeping the case array consistent
//! - [`segment_statistics`]: counts and durations of rising/falling segments
//!
//! ## Usage
//!
//! ```rust
//! use sd_core::classify_hydrological_case;
//! use sd_segments::{aggregate_segment, define_segments};
//!
//! let values = [0.0, 2.0, 4.0, 3.0, 2.0, 2.5, 3.0, 1.0];
//! let positions: Vec<usize> = (0..values.len()).collect();
//! let segments = define_segments(&positions, &values).unwrap();
//! let cases = classify_hydrological_case(&values).unwrap();
//!
//! let (coarser, _cases) = aggregate_segment(&segments, &cases, &values, None).unwrap();
//! assert!(coarser.len() < segments.len());
//! ```

pub mod aggregate;
pub mod define;
pub mod trim;
pub mod types;

pub use aggregate::aggregate_segment;
pub use define::{define_segments, renormalize_relevance};
pub use trim::{trim_series, TrimmedPair, TrimmedSeries};
pub use types::{segment_statistics, Segment, SegmentStatistics};
