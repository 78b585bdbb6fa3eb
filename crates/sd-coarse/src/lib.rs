//! Coarse graining of observed/simulated hydrograph events
//!
//! The series distance of two hydrographs depends on how finely they are
//! segmented. This crate searches, event by event, for the segmentation
//! level that balances agreement of the hydrological cases against timing
//! and magnitude errors.
//!
//! # Features
//!
//! - `parallel`: evaluate candidate merges and split windows with rayon
//!
//! # Example
//!
//! ```rust
//! use sd_coarse::{coarse_grain, CoarseGrainingParameters, ObjectiveWeights};
//! use sd_distance::ErrorModel;
//!
//! let obs = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 4.0, 3.0, 1.0];
//! let sim = [1.0, 1.0, 2.0, 3.0, 2.0, 2.0, 3.0, 4.0, 2.0, 1.0];
//! let obs_index: Vec<usize> = (0..obs.len()).collect();
//! let sim_index: Vec<usize> = (0..sim.len()).collect();
//!
//! let params = CoarseGrainingParameters::default()
//!     .with_weights(ObjectiveWeights::new(1.0, 1.0, 5.0, 0.0))
//!     .with_error_model(ErrorModel::Relative);
//! let result = coarse_grain(&obs, &obs_index, &sim, &sim_index, &params).unwrap();
//! println!("{result}");
//! ```

pub mod observer;
pub mod optimizer;
pub mod params;
pub mod splits;
pub mod types;

pub use observer::{CoarseGrainingObserver, NullObserver};
pub use optimizer::{coarse_grain, coarse_grain_with_observer, CoarseGrainer};
pub use params::{CoarseGrainingParameters, ObjectiveWeights};
pub use splits::coarse_grain_splits;
pub use types::{CoarseGrainingResult, SplitsResult, StepCriteria, StepRecord};
