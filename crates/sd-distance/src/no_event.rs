//! 1-D error outside of matched events

use crate::types::{Connectors, ErrorModel};
use sd_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors between observation and simulation at samples that belong to no
/// matched event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoEventError {
    /// Magnitude error per retained sample
    pub errors: Vec<f64>,
    /// Positions of the retained samples
    pub positions: Vec<usize>,
    /// Vertical connectors at the retained samples
    pub connectors: Connectors,
}

impl NoEventError {
    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether every sample belongs to an event
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Magnitude errors at every sample outside of the matched events
///
/// Events are inclusive `(start, end)` sample ranges. Each `mapping` entry
/// pairs the start of an observed event with the start of a simulated one;
/// all samples from the earlier start to the later end of the pair are
/// excluded.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `obs` and `sim` differ in length, a mapped
/// start does not name an event, or a mapped event ends before it starts.
pub fn no_event_error(
    obs: &[f64],
    sim: &[f64],
    obs_events: &[(usize, usize)],
    sim_events: &[(usize, usize)],
    mapping: &[(usize, usize)],
    model: ErrorModel,
) -> Result<NoEventError> {
    if obs.len() != sim.len() {
        return Err(Error::size_mismatch(obs.len(), sim.len(), "simulated series"));
    }

    let mut excluded = vec![false; obs.len()];
    for &(obs_start, sim_start) in mapping {
        let obs_end = event_end(obs_events, obs_start, "observed")?;
        let sim_end = event_end(sim_events, sim_start, "simulated")?;
        let start = obs_start.min(sim_start);
        let end = obs_end.max(sim_end);
        if start < excluded.len() {
            let end = end.min(excluded.len() - 1);
            excluded[start..=end].fill(true);
        }
    }

    let positions: Vec<usize> = (0..obs.len()).filter(|&i| !excluded[i]).collect();
    let obs_y: Vec<f64> = positions.iter().map(|&i| obs[i]).collect();
    let sim_y: Vec<f64> = positions.iter().map(|&i| sim[i]).collect();
    let errors = obs_y
        .iter()
        .zip(&sim_y)
        .map(|(&o, &s)| model.magnitude_error(o, s))
        .collect();
    let x: Vec<f64> = positions.iter().map(|&i| i as f64).collect();

    debug!(
        retained = positions.len(),
        excluded = obs.len() - positions.len(),
        "no-event error computed"
    );

    Ok(NoEventError {
        errors,
        positions,
        connectors: Connectors {
            obs_x: x.clone(),
            obs_y,
            sim_x: x,
            sim_y,
        },
    })
}

fn event_end(events: &[(usize, usize)], start: usize, series: &str) -> Result<usize> {
    let end = events
        .iter()
        .find(|(s, _)| *s == start)
        .map(|&(_, end)| end)
        .ok_or_else(|| Error::InvalidInput(format!("no {series} event starts at {start}")))?;
    if end < start {
        return Err(Error::InvalidInput(format!(
            "{series} event ends at {end} before its start {start}"
        )));
    }
    Ok(end)
}
