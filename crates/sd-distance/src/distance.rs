//! Series distance between two segmented hydrographs
//!
//! Each observed segment is paired with the simulated segment at the same
//! position. Both are sampled with the same number of evenly spaced
//! connectors, and every connector yields one timing and one magnitude
//! error. The connector budget of the event is the mean of the two series
//! lengths, shared out in proportion to segment relevance.

use crate::types::{relative_error, Connectors, DistanceResult, ErrorModel, LimbErrors};
use sd_core::utils::{interp, linspace, round_count};
use sd_core::{Error, Result};
use sd_segments::Segment;
use tracing::trace;

/// Compute timing and magnitude errors between matched segments
///
/// `obs` and `sim` are the (trimmed) series the segments were defined on.
/// The segment lists must have equal, non-zero length; segment `z` of the
/// observation is matched with segment `z` of the simulation.
///
/// # Errors
///
/// [`Error::InvalidInput`] for empty or unequal segment lists, or segments
/// that reach beyond their series.
///
/// # Examples
///
/// ```rust
/// use sd_distance::{series_distance, ErrorModel};
/// use sd_segments::define_segments;
///
/// let obs = [1.0, 3.0, 5.0, 2.0];
/// let sim = [1.0, 2.0, 5.0, 3.0];
/// let positions = [0, 1, 2, 3];
/// let obs_segs = define_segments(&positions, &obs).unwrap();
/// let sim_segs = define_segments(&positions, &sim).unwrap();
///
/// let result = series_distance(&obs, &obs_segs, &sim, &sim_segs, ErrorModel::Standard).unwrap();
/// assert_eq!(result.timing.iter().filter(|t| **t != 0.0).count(), 0);
/// ```
pub fn series_distance(
    obs: &[f64],
    obs_segs: &[Segment],
    sim: &[f64],
    sim_segs: &[Segment],
    model: ErrorModel,
) -> Result<DistanceResult> {
    if obs_segs.is_empty() {
        return Err(Error::InvalidInput("no segments to compare".to_string()));
    }
    if obs_segs.len() != sim_segs.len() {
        return Err(Error::size_mismatch(
            obs_segs.len(),
            sim_segs.len(),
            "simulated segment list",
        ));
    }
    check_bounds(obs_segs, obs.len(), "observed")?;
    check_bounds(sim_segs, sim.len(), "simulated")?;

    let total_connectors = round_count((obs.len() + sim.len()) as f64 * 0.5) as f64;
    let sum_rels: f64 = obs_segs
        .iter()
        .chain(sim_segs.iter())
        .map(|s| s.relevance)
        .sum();

    let mut rise = LimbErrors::default();
    let mut fall = LimbErrors::default();
    let mut connectors = Connectors::default();

    for (o, s) in obs_segs.iter().zip(sim_segs.iter()) {
        let num = if sum_rels > 0.0 {
            round_count(total_connectors * (o.relevance + s.relevance) / sum_rels)
        } else {
            0
        };

        let obs_x = linspace(o.start_global as f64, o.end_global as f64, num);
        let sim_x = linspace(s.start_global as f64, s.end_global as f64, num);
        let obs_y = sample_segment(obs, o, num);
        let sim_y = sample_segment(sim, s, num);

        let limb = if o.is_rise() { &mut rise } else { &mut fall };
        for i in 0..num {
            limb.timing.push(obs_x[i] - sim_x[i]);
            limb.magnitude.push(model.magnitude_error(obs_y[i], sim_y[i]));
        }
        limb.sim_values.extend_from_slice(&sim_y);

        let overlap = o.start_local.max(s.start_local)..=o.end_local.min(s.end_local);
        limb.vertical
            .extend(overlap.map(|i| relative_error(obs[i], sim[i])));

        connectors.extend(&obs_x, &obs_y, &sim_x, &sim_y);
    }

    trace!(
        segments = obs_segs.len(),
        rise = rise.len(),
        fall = fall.len(),
        "series distance computed"
    );

    Ok(DistanceResult {
        magnitude: concat(&rise.magnitude, &fall.magnitude),
        timing: concat(&rise.timing, &fall.timing),
        sim_values: concat(&rise.sim_values, &fall.sim_values),
        rise,
        fall,
        connectors,
        error_model: model,
    })
}

/// `num` interpolated values, evenly spaced over the local span of `seg`
fn sample_segment(values: &[f64], seg: &Segment, num: usize) -> Vec<f64> {
    let xp: Vec<f64> = seg.local_range().map(|i| i as f64).collect();
    let fp = &values[seg.local_range()];
    linspace(seg.start_local as f64, seg.end_local as f64, num)
        .into_iter()
        .map(|x| interp(x, &xp, fp))
        .collect()
}

fn check_bounds(segments: &[Segment], len: usize, series: &str) -> Result<()> {
    match segments
        .iter()
        .find(|s| s.start_local > s.end_local || s.end_local >= len)
    {
        Some(seg) => Err(Error::InvalidInput(format!(
            "{series} segment [{}, {}] does not fit a series of {len} samples",
            seg.start_local, seg.end_local
        ))),
        None => Ok(()),
    }
}

fn concat(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}
