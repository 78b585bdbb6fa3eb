//! Trimming of observed/simulated pairs to matching start and end cases
//!
//! The series distance needs both series to start with the same kind of
//! limb (both rising or both falling) and to end with the same kind. The
//! trimmer cuts the least number of samples that achieves this.

use sd_core::{classify_hydrological_case, Error, HydCase, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One trimmed series with its global positions and hydrological cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimmedSeries {
    /// Trimmed values
    pub values: Vec<f64>,
    /// Global index of each trimmed value
    pub positions: Vec<usize>,
    /// Hydrological cases of the trimmed values
    pub cases: Vec<HydCase>,
}

impl TrimmedSeries {
    fn cut(values: &[f64], offset: usize, start: usize, end: usize) -> Result<Self> {
        let values = values[start..=end].to_vec();
        let cases = classify_hydrological_case(&values)?;
        let positions = (offset + start..=offset + end).collect();
        Ok(Self {
            values,
            positions,
            cases,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Observed and simulated series after trimming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimmedPair {
    pub obs: TrimmedSeries,
    pub sim: TrimmedSeries,
}

/// Trim `obs` and `sim` so both start and both end with the same case
///
/// `obs_offset` and `sim_offset` are the global indices of the first
/// sample of each series.
///
/// Start: the first `Rise` indices of both series are summed, likewise the
/// first `Drop` indices; the pair with the smaller sum is used, ties go to
/// `Rise`. End: the last `Rise` and last `Drop` indices are summed; the pair
/// with the larger sum is used, ties go to `Drop`. Start and end are chosen
/// independently.
///
/// # Errors
///
/// - [`Error::NoFeatureFound`] if either series has no `Rise` or no `Drop`
///   sample
/// - [`Error::InvalidInput`] if a trimmed series would be shorter than two
///   samples
pub fn trim_series(
    obs: &[f64],
    obs_offset: usize,
    sim: &[f64],
    sim_offset: usize,
) -> Result<TrimmedPair> {
    let obs_cases = classify_hydrological_case(obs)?;
    let sim_cases = classify_hydrological_case(sim)?;

    let obs_marks = FeatureMarks::locate(&obs_cases, "observed")?;
    let sim_marks = FeatureMarks::locate(&sim_cases, "simulated")?;

    let (start_obs, start_sim) =
        if obs_marks.first_rise + sim_marks.first_rise <= obs_marks.first_drop + sim_marks.first_drop {
            (obs_marks.first_rise, sim_marks.first_rise)
        } else {
            (obs_marks.first_drop, sim_marks.first_drop)
        };

    let (end_obs, end_sim) =
        if obs_marks.last_rise + sim_marks.last_rise > obs_marks.last_drop + sim_marks.last_drop {
            (obs_marks.last_rise, sim_marks.last_rise)
        } else {
            (obs_marks.last_drop, sim_marks.last_drop)
        };

    if end_obs <= start_obs || end_sim <= start_sim {
        return Err(Error::InvalidInput(format!(
            "trimming leaves fewer than 2 samples (obs {start_obs}..={end_obs}, sim {start_sim}..={end_sim})"
        )));
    }

    debug!(
        start_obs,
        end_obs, start_sim, end_sim, "trimmed series to matching start and end cases"
    );

    Ok(TrimmedPair {
        obs: TrimmedSeries::cut(obs, obs_offset, start_obs, end_obs)?,
        sim: TrimmedSeries::cut(sim, sim_offset, start_sim, end_sim)?,
    })
}

struct FeatureMarks {
    first_rise: usize,
    last_rise: usize,
    first_drop: usize,
    last_drop: usize,
}

impl FeatureMarks {
    fn locate(cases: &[HydCase], series: &'static str) -> Result<Self> {
        let missing = |case| Error::NoFeatureFound { series, case };
        let first_rise = cases
            .iter()
            .position(|&c| c == HydCase::Rise)
            .ok_or_else(|| missing("rise"))?;
        let last_rise = cases
            .iter()
            .rposition(|&c| c == HydCase::Rise)
            .ok_or_else(|| missing("rise"))?;
        let first_drop = cases
            .iter()
            .position(|&c| c == HydCase::Drop)
            .ok_or_else(|| missing("drop"))?;
        let last_drop = cases
            .iter()
            .rposition(|&c| c == HydCase::Drop)
            .ok_or_else(|| missing("drop"))?;
        Ok(Self {
            first_rise,
            last_rise,
            first_drop,
            last_drop,
        })
    }
}
