//! Parameters of the coarse-graining search

use sd_core::{Error, Result};
use sd_distance::ErrorModel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Weights of the four criteria in the objective function
///
/// Larger weights make a criterion more important. The candidate search
/// uses all four; the selection of the best step uses `nfc`, `sdt` and
/// `sdv`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Fraction of samples whose hydrological case was changed by merging
    pub nfc: f64,
    /// Relevance of the removed segments
    pub rds: f64,
    /// Mean absolute timing error
    pub sdt: f64,
    /// Mean absolute magnitude error
    pub sdv: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            nfc: 1.0,
            rds: 1.0,
            sdt: 5.0,
            sdv: 0.0,
        }
    }
}

impl ObjectiveWeights {
    /// Create weights from the four criterion weights
    pub fn new(nfc: f64, rds: f64, sdt: f64, sdv: f64) -> Self {
        Self { nfc, rds, sdt, sdv }
    }

    /// Check that all weights are finite, non-negative and not all zero
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("nfc", self.nfc),
            ("rds", self.rds),
            ("sdt", self.sdt),
            ("sdv", self.sdv),
        ];
        if let Some((name, w)) = named.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidInput(format!(
                "weight {name} must be finite and non-negative, got {w}"
            )));
        }
        if named.iter().all(|(_, w)| *w == 0.0) {
            return Err(Error::InvalidInput("all objective weights are zero".to_string()));
        }
        Ok(())
    }
}

/// Parameters for coarse graining one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseGrainingParameters {
    /// Objective function weights
    pub weights: ObjectiveWeights,

    /// Error model of the reported series distance of every step
    pub error_model: ErrorModel,

    /// Error model used while scoring candidate merges
    pub search_error_model: ErrorModel,

    /// Stop reducing after this much wall time and select among the steps
    /// finished so far
    #[serde(skip)]
    pub deadline: Option<Duration>,
}

impl Default for CoarseGrainingParameters {
    fn default() -> Self {
        Self {
            weights: ObjectiveWeights::default(),
            error_model: ErrorModel::Relative,
            search_error_model: ErrorModel::Relative,
            deadline: None,
        }
    }
}

impl CoarseGrainingParameters {
    /// Parameters that favour steps with small timing errors
    pub fn timing_focused() -> Self {
        Self {
            weights: ObjectiveWeights::new(1.0, 1.0, 10.0, 0.0),
            ..Self::default()
        }
    }

    /// Parameters that weigh magnitude errors as strongly as timing errors
    pub fn magnitude_focused() -> Self {
        Self {
            weights: ObjectiveWeights::new(1.0, 1.0, 5.0, 5.0),
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_error_model(mut self, model: ErrorModel) -> Self {
        self.error_model = model;
        self
    }

    pub fn with_search_error_model(mut self, model: ErrorModel) -> Self {
        self.search_error_model = model;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Check the parameters before a run
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()
    }
}
