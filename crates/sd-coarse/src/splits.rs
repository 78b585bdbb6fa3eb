//! Coarse graining of continuous series cut into windows

use crate::optimizer::coarse_grain;
use crate::params::CoarseGrainingParameters;
use crate::types::{CoarseGrainingResult, SplitsResult};
use sd_core::{Error, Result};
use sd_distance::Connectors;
use tracing::{debug, instrument, warn};

/// Coarse grain every window `[splits[i], splits[i + 1])` of a continuous
/// observed/simulated pair
///
/// Windows are processed independently, in parallel with the `parallel`
/// feature. A failing window is kept as an `Err` in
/// [`SplitsResult::splits`] and left out of the concatenated outputs.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `obs` and `sim` differ in length, fewer than
/// two split positions are given, the splits are not strictly ascending, or
/// a split lies beyond the series.
#[instrument(skip_all, fields(len = obs.len(), windows = splits.len().saturating_sub(1)))]
pub fn coarse_grain_splits(
    obs: &[f64],
    sim: &[f64],
    splits: &[usize],
    params: &CoarseGrainingParameters,
) -> Result<SplitsResult> {
    if obs.len() != sim.len() {
        return Err(Error::size_mismatch(obs.len(), sim.len(), "simulated series"));
    }
    if splits.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "need at least 2 split positions, got {}",
            splits.len()
        )));
    }
    if splits.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::InvalidInput(
            "split positions must be strictly ascending".to_string(),
        ));
    }
    if let Some(&last) = splits.last().filter(|&&last| last > obs.len()) {
        return Err(Error::InvalidInput(format!(
            "split position {last} beyond series of {} samples",
            obs.len()
        )));
    }
    params.validate()?;

    let run = |w: &[usize]| -> Result<CoarseGrainingResult> {
        let index: Vec<usize> = (w[0]..w[1]).collect();
        coarse_grain(obs, &index, sim, &index, params)
    };

    #[cfg(feature = "parallel")]
    let results: Vec<Result<CoarseGrainingResult>> = {
        use rayon::prelude::*;
        splits.par_windows(2).map(run).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<CoarseGrainingResult>> = splits.windows(2).map(run).collect();

    let mut combined = SplitsResult {
        obs_segments: Vec::new(),
        sim_segments: Vec::new(),
        connectors: Connectors::default(),
        timing: Vec::new(),
        magnitude: Vec::new(),
        splits: Vec::with_capacity(results.len()),
    };
    for (i, result) in results.into_iter().enumerate() {
        match &result {
            Ok(r) => {
                combined.obs_segments.extend_from_slice(&r.obs_segments);
                combined.sim_segments.extend_from_slice(&r.sim_segments);
                combined.connectors.append(r.connectors());
                combined.timing.extend_from_slice(&r.distance.timing);
                combined.magnitude.extend_from_slice(&r.distance.magnitude);
            }
            Err(err) => warn!(
                window = i,
                start = splits[i],
                structural = err.is_structural(),
                %err,
                "window failed"
            ),
        }
        combined.splits.push(result);
    }

    debug!(
        succeeded = combined.succeeded(),
        windows = combined.splits.len(),
        "coarse grained all windows"
    );
    Ok(combined)
}
