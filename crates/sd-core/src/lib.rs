//! Core types and helpers for series distance analysis
//!
//! This crate provides the pieces shared by every stage of the series
//! distance pipeline:
//!
//! - [`Error`] and [`Result`]: the unified error type of all sd-* crates
//! - [`HydCase`] and [`classify_hydrological_case`]: per-sample rise/fall/
//!   peak/valley labels
//! - [`normalize`]: NaN-aware min-max scaling of objective criteria
//! - [`replace_equal_neighbours`]: optional plateau pre-processing
//! - [`utils`]: interpolation, spacing and reduction helpers
//!
//! # Example
//!
//! ```rust
//! use sd_core::{classify_hydrological_case, HydCase};
//!
//! let cases = classify_hydrological_case(&[1.0, 2.0, 1.0]).unwrap();
//! assert_eq!(cases[1], HydCase::Peak);
//! ```

pub mod error;
pub mod hydcase;
pub mod normalize;
pub mod preprocess;
pub mod utils;

pub use error::{Error, Result};
pub use hydcase::{classify_hydrological_case, HydCase};
pub use normalize::normalize;
pub use preprocess::replace_equal_neighbours;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
