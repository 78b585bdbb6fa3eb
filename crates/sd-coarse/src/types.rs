//! Result types of the coarse-graining search

use sd_core::{Error, Result};
use sd_distance::{Connectors, DistanceResult};
use sd_segments::{Segment, SegmentStatistics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global criteria of one coarse-graining step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepCriteria {
    /// Fraction of changed hydrological cases, observation plus simulation
    pub perc_false_case: f64,
    /// Mean absolute timing error, NaN without connectors
    pub mafdist_t: f64,
    /// Mean absolute magnitude error, NaN without connectors
    pub mafdist_v: f64,
}

/// State after one coarse-graining step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step number, 0 for the equalized initial state
    pub step: usize,
    /// Interior (observed, simulated) segment indices removed in this step
    pub removed: Option<(usize, usize)>,
    pub obs_segments: Vec<Segment>,
    pub sim_segments: Vec<Segment>,
    /// Series distance of this segmentation with the reporting error model
    pub distance: DistanceResult,
    pub criteria: StepCriteria,
}

impl StepRecord {
    /// Connectors of this step
    pub fn connectors(&self) -> &Connectors {
        &self.distance.connectors
    }
}

/// Result of coarse graining one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseGrainingResult {
    /// Observed segments of the selected step
    pub obs_segments: Vec<Segment>,
    /// Simulated segments of the selected step
    pub sim_segments: Vec<Segment>,
    /// Series distance of the selected step
    pub distance: DistanceResult,
    /// Objective value per step; empty when no reduction was possible
    pub objective: Vec<f64>,
    /// Selected step, 0 is the equalized initial state
    pub optimal_step: usize,
    /// Number of reduction steps the segment count allows
    pub reduction_steps: usize,
    /// Every completed step, starting with the initial state
    pub steps: Vec<StepRecord>,
    /// Statistics of the initial observed segmentation
    pub obs_statistics: SegmentStatistics,
    /// Statistics of the initial simulated segmentation
    pub sim_statistics: SegmentStatistics,
    /// Mean absolute timing error per step
    pub mafdist_t: Vec<f64>,
    /// Mean absolute magnitude error per step
    pub mafdist_v: Vec<f64>,
    /// Fraction of changed hydrological cases per step
    pub perc_false_case: Vec<f64>,
    /// Whether reduction stopped at the deadline
    pub timed_out: bool,
    /// Whether reduction stopped because no candidate merge was usable
    pub stopped_early: bool,
}

impl CoarseGrainingResult {
    /// Connectors of the selected step
    pub fn connectors(&self) -> &Connectors {
        &self.distance.connectors
    }

    /// Number of completed reduction steps
    pub fn completed_steps(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

impl fmt::Display for CoarseGrainingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Coarse Graining Result:")?;
        writeln!(
            f,
            "  Steps: {} of {}{}",
            self.completed_steps(),
            self.reduction_steps,
            if self.timed_out {
                " (timed out)"
            } else if self.stopped_early {
                " (no usable merge)"
            } else {
                ""
            }
        )?;
        writeln!(f, "  Selected step: {}", self.optimal_step)?;
        writeln!(
            f,
            "  Segments: {} observed, {} simulated",
            self.obs_segments.len(),
            self.sim_segments.len()
        )?;
        write!(f, "{}", self.distance)
    }
}

/// Results of coarse graining a continuous series split into windows
#[derive(Debug, Clone, PartialEq)]
pub struct SplitsResult {
    /// Per-window result, in split order
    pub splits: Vec<Result<CoarseGrainingResult>>,
    /// Selected observed segments of all successful windows
    pub obs_segments: Vec<Segment>,
    /// Selected simulated segments of all successful windows
    pub sim_segments: Vec<Segment>,
    /// Connectors of all successful windows
    pub connectors: Connectors,
    /// Timing errors of all successful windows
    pub timing: Vec<f64>,
    /// Magnitude errors of all successful windows
    pub magnitude: Vec<f64>,
}

impl SplitsResult {
    /// Number of windows that coarse grained successfully
    pub fn succeeded(&self) -> usize {
        self.splits.iter().filter(|r| r.is_ok()).count()
    }

    /// Window index and error of every failed window
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.splits
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }
}
