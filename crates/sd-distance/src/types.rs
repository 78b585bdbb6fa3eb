//! Types used for series distance computation

use sd_core::utils::mean_abs;
use sd_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the magnitude distance between an observed and a simulated value is
/// measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorModel {
    /// `obs - sim`
    Standard,
    /// `(obs - sim) / (0.5 * (obs + sim))`
    #[default]
    Relative,
}

impl ErrorModel {
    /// Magnitude error between an observed and a simulated value
    ///
    /// Positive means the observation is larger. For [`ErrorModel::Relative`]
    /// a zero mean gives 0 when both values are equal and NaN otherwise.
    #[inline]
    pub fn magnitude_error(self, obs: f64, sim: f64) -> f64 {
        match self {
            ErrorModel::Standard => obs - sim,
            ErrorModel::Relative => relative_error(obs, sim),
        }
    }
}

/// `(obs - sim) / (0.5 * (obs + sim))` with the zero-mean policy of
/// [`ErrorModel::magnitude_error`]
#[inline]
pub fn relative_error(obs: f64, sim: f64) -> f64 {
    let diff = obs - sim;
    let mean = 0.5 * (obs + sim);
    if mean == 0.0 {
        if diff == 0.0 {
            0.0
        } else {
            f64::NAN
        }
    } else {
        diff / mean
    }
}

impl FromStr for ErrorModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ErrorModel::Standard),
            "relative" => Ok(ErrorModel::Relative),
            _ => Err(Error::UnknownErrorModel(s.to_string())),
        }
    }
}

impl fmt::Display for ErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorModel::Standard => write!(f, "standard"),
            ErrorModel::Relative => write!(f, "relative"),
        }
    }
}

/// Matched observed/simulated points, as parallel arrays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connectors {
    /// Global x-position of each observed connector point
    pub obs_x: Vec<f64>,
    /// Value at each observed connector point
    pub obs_y: Vec<f64>,
    /// Global x-position of each simulated connector point
    pub sim_x: Vec<f64>,
    /// Value at each simulated connector point
    pub sim_y: Vec<f64>,
}

impl Connectors {
    /// Number of connectors
    pub fn len(&self) -> usize {
        self.obs_x.len()
    }

    /// Whether there are no connectors
    pub fn is_empty(&self) -> bool {
        self.obs_x.is_empty()
    }

    pub(crate) fn extend(&mut self, obs_x: &[f64], obs_y: &[f64], sim_x: &[f64], sim_y: &[f64]) {
        self.obs_x.extend_from_slice(obs_x);
        self.obs_y.extend_from_slice(obs_y);
        self.sim_x.extend_from_slice(sim_x);
        self.sim_y.extend_from_slice(sim_y);
    }

    /// Append another connector set
    pub fn append(&mut self, other: &Connectors) {
        self.extend(&other.obs_x, &other.obs_y, &other.sim_x, &other.sim_y);
    }
}

/// Timing and magnitude errors of one limb type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimbErrors {
    /// Magnitude error per connector
    pub magnitude: Vec<f64>,
    /// Timing error per connector (`obs_x - sim_x`, positive = obs later)
    pub timing: Vec<f64>,
    /// Simulated value per connector, for binning errors by discharge
    pub sim_values: Vec<f64>,
    /// 1-D vertical errors over the overlapping sample range of each
    /// segment pair, always in relative form
    pub vertical: Vec<f64>,
}

impl LimbErrors {
    /// Number of connectors
    pub fn len(&self) -> usize {
        self.timing.len()
    }

    /// Whether there are no connectors
    pub fn is_empty(&self) -> bool {
        self.timing.is_empty()
    }
}

/// Result of a series distance computation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// Magnitude errors, rising limbs first, then falling limbs
    pub magnitude: Vec<f64>,
    /// Timing errors, rising limbs first, then falling limbs
    pub timing: Vec<f64>,
    /// Simulated values at the connectors, same order
    pub sim_values: Vec<f64>,
    /// Errors on rising limbs
    pub rise: LimbErrors,
    /// Errors on falling limbs
    pub fall: LimbErrors,
    /// Connector points in segment order
    pub connectors: Connectors,
    /// Error model the magnitudes were computed with
    pub error_model: ErrorModel,
}

impl DistanceResult {
    /// Mean absolute timing error, `None` without connectors
    pub fn mean_abs_timing(&self) -> Option<f64> {
        mean_abs(&self.timing)
    }

    /// Mean absolute magnitude error, `None` without connectors
    pub fn mean_abs_magnitude(&self) -> Option<f64> {
        mean_abs(&self.magnitude)
    }

    /// Number of connectors
    pub fn connector_count(&self) -> usize {
        self.timing.len()
    }
}

impl fmt::Display for DistanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Series Distance Result:")?;
        writeln!(f, "  Error model: {}", self.error_model)?;
        writeln!(
            f,
            "  Connectors: {} ({} rise, {} fall)",
            self.connector_count(),
            self.rise.len(),
            self.fall.len()
        )?;
        if let Some(t) = self.mean_abs_timing() {
            writeln!(f, "  Mean |timing error|: {t:.4}")?;
        }
        if let Some(v) = self.mean_abs_magnitude() {
            writeln!(f, "  Mean |magnitude error|: {v:.4}")?;
        }
        Ok(())
    }
}
