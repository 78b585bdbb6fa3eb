//! Series distance for hydrograph evaluation
//!
//! Compares an observed and a simulated hydrograph the way a hydrologist
//! would by eye: rising limbs are matched with rising limbs, falling limbs
//! with falling limbs, and every match is reported as a timing error and a
//! magnitude error. Before matching, both series are coarse grained to the
//! level of detail where the comparison is most meaningful.
//!
//! This crate re-exports the workspace members:
//!
//! - [`sd_core`]: errors, hydrological cases, normalization and helpers
//! - [`sd_segments`]: segmentation, trimming and segment merging
//! - [`sd_distance`]: the series distance itself
//! - [`sd_coarse`]: the coarse-graining search and the continuous driver
//!
//! # Example
//!
//! ```rust
//! use series_distance::prelude::*;
//!
//! let obs = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 4.0, 3.0, 1.0];
//! let sim = [1.0, 1.0, 2.0, 3.0, 2.0, 2.0, 3.0, 4.0, 2.0, 1.0];
//! let obs_index: Vec<usize> = (0..obs.len()).collect();
//! let sim_index: Vec<usize> = (0..sim.len()).collect();
//!
//! let result = coarse_grain(&obs, &obs_index, &sim, &sim_index, &CoarseGrainingParameters::default())?;
//! let timing = result.distance.mean_abs_timing();
//! assert!(timing.is_some());
//! # Ok::<(), Error>(())
//! ```

pub use sd_coarse;
pub use sd_core;
pub use sd_distance;
pub use sd_segments;

pub use sd_coarse::{
    coarse_grain, coarse_grain_splits, coarse_grain_with_observer, CoarseGrainer,
    CoarseGrainingObserver, CoarseGrainingParameters, CoarseGrainingResult, NullObserver,
    ObjectiveWeights, SplitsResult, StepRecord,
};
pub use sd_core::{
    classify_hydrological_case, normalize, replace_equal_neighbours, Error, HydCase, Result,
};
pub use sd_distance::{
    no_event_error, series_distance, Connectors, DistanceResult, ErrorModel, NoEventError,
};
pub use sd_segments::{
    aggregate_segment, define_segments, segment_statistics, trim_series, Segment,
    SegmentStatistics, TrimmedPair,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use crate::{
        coarse_grain, coarse_grain_splits, series_distance, CoarseGrainingParameters,
        CoarseGrainingResult, DistanceResult, Error, ErrorModel, HydCase, ObjectiveWeights,
        Result, Segment,
    };
}
