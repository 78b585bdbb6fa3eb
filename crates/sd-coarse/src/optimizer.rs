//! Coarse-graining search
//!
//! An event starts out with one segment per monotonic section of each
//! hydrograph. Small wiggles then dominate the series distance, so segments
//! are merged step by step, jointly in the observed and simulated series,
//! and the step with the best compromise between few changed hydrological
//! cases and small distance errors is kept.
//!
//! [`CoarseGrainer`] walks through the states
//! `Init -> Equalize -> Reduce* -> Select`, one method per state.
//! [`coarse_grain`] runs all of them.

use crate::observer::{CoarseGrainingObserver, NullObserver};
use crate::params::{CoarseGrainingParameters, ObjectiveWeights};
use crate::types::{CoarseGrainingResult, StepCriteria, StepRecord};
use sd_core::utils::nan_argmin;
use sd_core::{normalize, Error, HydCase, Result};
use sd_distance::{series_distance, ErrorModel};
use sd_segments::{
    aggregate_segment, define_segments, segment_statistics, trim_series, Segment,
    SegmentStatistics,
};
use std::time::Instant;
use tracing::{debug, instrument, trace, warn};

/// Coarse grain one observed/simulated event pair
///
/// `obs_event_index` and `sim_event_index` select the event samples from
/// the full series; segment global positions refer to these indices.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for invalid parameters or event indices
///   outside the series
/// - [`Error::NoFeatureFound`] if an event has no rising or no falling
///   sample
/// - [`Error::ParityMismatch`] if the segment counts cannot be equalized
///
/// # Examples
///
/// ```rust
/// use sd_coarse::{coarse_grain, CoarseGrainingParameters};
///
/// let obs = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 4.0, 3.0, 1.0];
/// let sim = [1.0, 1.0, 2.0, 3.0, 2.0, 2.0, 3.0, 4.0, 2.0, 1.0];
/// let obs_index: Vec<usize> = (0..obs.len()).collect();
/// let sim_index: Vec<usize> = (0..sim.len()).collect();
///
/// let result = coarse_grain(&obs, &obs_index, &sim, &sim_index, &CoarseGrainingParameters::default()).unwrap();
/// assert!(result.optimal_step <= result.reduction_steps);
/// assert_eq!(result.obs_segments.len(), result.sim_segments.len());
/// ```
#[instrument(skip_all, fields(obs_len = obs_event_index.len(), sim_len = sim_event_index.len()))]
pub fn coarse_grain(
    obs: &[f64],
    obs_event_index: &[usize],
    sim: &[f64],
    sim_event_index: &[usize],
    params: &CoarseGrainingParameters,
) -> Result<CoarseGrainingResult> {
    CoarseGrainer::new(obs, obs_event_index, sim, sim_event_index, params)?.run()
}

/// [`coarse_grain`] reporting every state to `observer`
pub fn coarse_grain_with_observer<O: CoarseGrainingObserver>(
    obs: &[f64],
    obs_event_index: &[usize],
    sim: &[f64],
    sim_event_index: &[usize],
    params: &CoarseGrainingParameters,
    observer: O,
) -> Result<CoarseGrainingResult> {
    CoarseGrainer::with_observer(obs, obs_event_index, sim, sim_event_index, params, observer)?
        .run()
}

/// One series of the event while it is being coarse grained
#[derive(Debug, Clone)]
struct EventSeries {
    values: Vec<f64>,
    /// Cases of the trimmed series before any merge; never updated
    original_cases: Vec<HydCase>,
    cases: Vec<HydCase>,
    segments: Vec<Segment>,
}

impl EventSeries {
    fn new(values: Vec<f64>, positions: &[usize], cases: Vec<HydCase>) -> Result<Self> {
        let segments = define_segments(positions, &values)?;
        Ok(Self {
            original_cases: cases.clone(),
            cases,
            values,
            segments,
        })
    }

    /// Fraction of samples whose case differs from the original
    fn false_case_fraction(&self, cases: &[HydCase]) -> f64 {
        let changed = cases
            .iter()
            .zip(&self.original_cases)
            .filter(|(now, before)| now != before)
            .count();
        changed as f64 / self.values.len() as f64
    }

    fn aggregate(&self, target: Option<usize>) -> Result<(Vec<Segment>, Vec<HydCase>)> {
        aggregate_segment(&self.segments, &self.cases, &self.values, target)
    }

    /// Every interior removal, `None` where aggregation fails
    fn removals(&self, series: &'static str) -> Vec<Option<Removal>> {
        (1..self.segments.len().saturating_sub(1))
            .map(|index| match self.aggregate(Some(index)) {
                Ok((segments, cases)) => Some(Removal {
                    false_cases: self.false_case_fraction(&cases),
                    relevance: self.segments[index].relevance,
                    segments,
                    cases,
                }),
                Err(err) => {
                    trace!(series, index, %err, "skipping removal");
                    None
                }
            })
            .collect()
    }
}

/// Tentative state of one series after removing one segment
#[derive(Debug, Clone)]
struct Removal {
    segments: Vec<Segment>,
    cases: Vec<HydCase>,
    false_cases: f64,
    relevance: f64,
}

/// Criteria of one candidate pair of removals
#[derive(Debug, Clone, Copy)]
struct Criteria {
    nfc: f64,
    rds: f64,
    sdt: f64,
    sdv: f64,
}

impl Criteria {
    /// Whether every criterion that carries weight is finite
    fn is_usable(&self, weights: &ObjectiveWeights) -> bool {
        [
            (weights.nfc, self.nfc),
            (weights.rds, self.rds),
            (weights.sdt, self.sdt),
            (weights.sdv, self.sdv),
        ]
        .iter()
        .all(|(w, c)| *w == 0.0 || c.is_finite())
    }
}

fn evaluate_candidate(
    obs: &[f64],
    obs_removal: &Removal,
    sim: &[f64],
    sim_removal: &Removal,
    model: ErrorModel,
    weights: &ObjectiveWeights,
) -> Option<Criteria> {
    let distance = series_distance(
        obs,
        &obs_removal.segments,
        sim,
        &sim_removal.segments,
        model,
    )
    .ok()?;
    let criteria = Criteria {
        nfc: obs_removal.false_cases + sim_removal.false_cases,
        rds: obs_removal.relevance + sim_removal.relevance,
        sdt: distance.mean_abs_timing().unwrap_or(f64::NAN),
        sdv: distance.mean_abs_magnitude().unwrap_or(f64::NAN),
    };
    criteria.is_usable(weights).then_some(criteria)
}

/// `sqrt(sum(w * x^2))` over the terms with non-zero weight
fn weighted_norm(terms: &[(f64, f64)]) -> f64 {
    terms
        .iter()
        .filter(|(w, _)| *w != 0.0)
        .map(|(w, x)| w * x * x)
        .sum::<f64>()
        .sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initialized,
    Equalized,
}

/// Coarse-graining state machine for one event
pub struct CoarseGrainer<'p, O: CoarseGrainingObserver = NullObserver> {
    params: &'p CoarseGrainingParameters,
    observer: O,
    obs: EventSeries,
    sim: EventSeries,
    obs_statistics: SegmentStatistics,
    sim_statistics: SegmentStatistics,
    phase: Phase,
    reduction_steps: usize,
    steps: Vec<StepRecord>,
    started: Instant,
    timed_out: bool,
    stopped_early: bool,
}

impl<'p> CoarseGrainer<'p, NullObserver> {
    /// Gather, trim and segment an event (state `Init`)
    pub fn new(
        obs: &[f64],
        obs_event_index: &[usize],
        sim: &[f64],
        sim_event_index: &[usize],
        params: &'p CoarseGrainingParameters,
    ) -> Result<Self> {
        Self::with_observer(obs, obs_event_index, sim, sim_event_index, params, NullObserver)
    }
}

impl<'p, O: CoarseGrainingObserver> CoarseGrainer<'p, O> {
    /// Gather, trim and segment an event, reporting to `observer`
    pub fn with_observer(
        obs: &[f64],
        obs_event_index: &[usize],
        sim: &[f64],
        sim_event_index: &[usize],
        params: &'p CoarseGrainingParameters,
        observer: O,
    ) -> Result<Self> {
        params.validate()?;
        let started = Instant::now();

        let obs_values = gather(obs, obs_event_index, "observed")?;
        let sim_values = gather(sim, sim_event_index, "simulated")?;
        let trimmed = trim_series(&obs_values, 0, &sim_values, 0)?;

        let obs_positions: Vec<usize> = trimmed
            .obs
            .positions
            .iter()
            .map(|&p| obs_event_index[p])
            .collect();
        let sim_positions: Vec<usize> = trimmed
            .sim
            .positions
            .iter()
            .map(|&p| sim_event_index[p])
            .collect();

        let obs = EventSeries::new(trimmed.obs.values, &obs_positions, trimmed.obs.cases)?;
        let sim = EventSeries::new(trimmed.sim.values, &sim_positions, trimmed.sim.cases)?;
        debug!(
            obs_segments = obs.segments.len(),
            sim_segments = sim.segments.len(),
            "initial segmentation"
        );

        Self::from_series(params, observer, obs, sim, started)
    }

    fn from_series(
        params: &'p CoarseGrainingParameters,
        mut observer: O,
        obs: EventSeries,
        sim: EventSeries,
        started: Instant,
    ) -> Result<Self> {
        observer.record_initial(&obs.values, &obs.segments, &sim.values, &sim.segments)?;
        Ok(Self {
            params,
            observer,
            obs_statistics: segment_statistics(&obs.segments),
            sim_statistics: segment_statistics(&sim.segments),
            obs,
            sim,
            phase: Phase::Initialized,
            reduction_steps: 0,
            steps: Vec::new(),
            started,
            timed_out: false,
            stopped_early: false,
        })
    }

    /// Merge segments of the series with more segments until both have the
    /// same count, and record the result as step 0 (state `Equalize`)
    ///
    /// # Errors
    ///
    /// [`Error::ParityMismatch`] if the counts differ by an odd number.
    pub fn equalize(&mut self) -> Result<()> {
        if self.phase != Phase::Initialized {
            return Err(Error::InvalidInput("event is already equalized".to_string()));
        }
        let (n_obs, n_sim) = (self.obs.segments.len(), self.sim.segments.len());
        if n_obs.abs_diff(n_sim) % 2 != 0 {
            return Err(Error::ParityMismatch {
                obs_segments: n_obs,
                sim_segments: n_sim,
            });
        }

        while self.obs.segments.len() != self.sim.segments.len() {
            let larger = if self.obs.segments.len() > self.sim.segments.len() {
                &mut self.obs
            } else {
                &mut self.sim
            };
            let (segments, cases) = larger.aggregate(None)?;
            larger.segments = segments;
            larger.cases = cases;
        }

        self.reduction_steps = (self.obs.segments.len() / 2).saturating_sub(1);
        self.phase = Phase::Equalized;
        debug!(
            segments = self.obs.segments.len(),
            reduction_steps = self.reduction_steps,
            "segment counts equalized"
        );

        self.record_step(None)
    }

    /// Number of reduction steps the equalized segment count allows
    pub fn reduction_steps(&self) -> usize {
        self.reduction_steps
    }

    /// Number of reduction steps that have not run yet
    pub fn remaining_steps(&self) -> usize {
        self.reduction_steps
            .saturating_sub(self.steps.len().saturating_sub(1))
    }

    /// Run one reduction step (state `Reduce`)
    ///
    /// Every pair of interior observed and simulated segments is tried as a
    /// joint removal; the pair with the smallest objective is applied.
    /// Returns `false` when no step is left or no candidate could be
    /// evaluated. In the latter case reduction is over and the result is
    /// marked as stopped early.
    #[instrument(skip_all, fields(step = self.steps.len()))]
    pub fn reduce(&mut self) -> Result<bool> {
        if self.phase != Phase::Equalized {
            return Err(Error::InvalidInput(
                "segment counts must be equalized before reducing".to_string(),
            ));
        }
        if self.remaining_steps() == 0 {
            return Ok(false);
        }

        let obs_removals = self.obs.removals("observed");
        let sim_removals = self.sim.removals("simulated");
        let size = obs_removals.len();
        let step = self.steps.len();
        if size == 0 || size != sim_removals.len() {
            warn!(
                step,
                obs_candidates = size,
                sim_candidates = sim_removals.len(),
                "no joint merge possible, stopping reduction"
            );
            self.stopped_early = true;
            return Ok(false);
        }

        let cells = self.evaluate_grid(&obs_removals, &sim_removals);
        let objective = self.score_grid(&cells);
        if self.observer.is_enabled() {
            self.observer.record_candidates(step, size, &objective)?;
        }

        let Some(best) = nan_argmin(&objective) else {
            warn!(step, "no candidate merge could be evaluated, stopping reduction");
            self.stopped_early = true;
            return Ok(false);
        };
        let (obs_index, sim_index) = (best / size, best % size);
        let skipped = cells.iter().filter(|c| c.is_none()).count();
        debug!(
            step,
            obs_segment = obs_index + 1,
            sim_segment = sim_index + 1,
            skipped,
            "applying best merge"
        );

        // winners are Some: their objective is finite
        if let (Some(o), Some(s)) = (&obs_removals[obs_index], &sim_removals[sim_index]) {
            self.obs.segments = o.segments.clone();
            self.obs.cases = o.cases.clone();
            self.sim.segments = s.segments.clone();
            self.sim.cases = s.cases.clone();
        }

        self.record_step(Some((obs_index + 1, sim_index + 1)))?;
        Ok(true)
    }

    fn evaluate_grid(
        &self,
        obs_removals: &[Option<Removal>],
        sim_removals: &[Option<Removal>],
    ) -> Vec<Option<Criteria>> {
        let size = obs_removals.len();
        let obs = self.obs.values.as_slice();
        let sim = self.sim.values.as_slice();
        let model = self.params.search_error_model;
        let weights = self.params.weights;

        let evaluate = |k: usize| match (&obs_removals[k / size], &sim_removals[k % size]) {
            (Some(o), Some(s)) => evaluate_candidate(obs, o, sim, s, model, &weights),
            _ => None,
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..size * size).into_par_iter().map(evaluate).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..size * size).map(evaluate).collect()
        }
    }

    /// Objective value per candidate, NaN for skipped candidates
    fn score_grid(&self, cells: &[Option<Criteria>]) -> Vec<f64> {
        let column = |pick: fn(&Criteria) -> f64| -> Vec<f64> {
            let raw: Vec<f64> = cells
                .iter()
                .map(|c| c.as_ref().map_or(f64::NAN, pick))
                .collect();
            normalize(&raw)
        };
        let nfc = column(|c| c.nfc);
        let rds = column(|c| c.rds);
        let sdt = column(|c| c.sdt);
        let sdv = column(|c| c.sdv);

        let w = &self.params.weights;
        cells
            .iter()
            .enumerate()
            .map(|(k, cell)| match cell {
                Some(_) => weighted_norm(&[
                    (w.nfc, nfc[k]),
                    (w.rds, rds[k]),
                    (w.sdt, sdt[k]),
                    (w.sdv, sdv[k]),
                ]),
                None => f64::NAN,
            })
            .collect()
    }

    fn record_step(&mut self, removed: Option<(usize, usize)>) -> Result<()> {
        let distance = series_distance(
            &self.obs.values,
            &self.obs.segments,
            &self.sim.values,
            &self.sim.segments,
            self.params.error_model,
        )?;
        let criteria = StepCriteria {
            perc_false_case: self.obs.false_case_fraction(&self.obs.cases)
                + self.sim.false_case_fraction(&self.sim.cases),
            mafdist_t: distance.mean_abs_timing().unwrap_or(f64::NAN),
            mafdist_v: distance.mean_abs_magnitude().unwrap_or(f64::NAN),
        };
        let record = StepRecord {
            step: self.steps.len(),
            removed,
            obs_segments: self.obs.segments.clone(),
            sim_segments: self.sim.segments.clone(),
            distance,
            criteria,
        };
        self.observer.record_step(&record)?;
        self.steps.push(record);
        Ok(())
    }

    fn deadline_passed(&self) -> bool {
        self.params
            .deadline
            .is_some_and(|deadline| self.started.elapsed() >= deadline)
    }

    /// Pick the step with the best global objective and build the result
    /// (state `Select`)
    pub fn select(mut self) -> Result<CoarseGrainingResult> {
        if self.phase != Phase::Equalized {
            return Err(Error::InvalidInput(
                "segment counts must be equalized before selecting".to_string(),
            ));
        }

        let perc_false_case: Vec<f64> =
            self.steps.iter().map(|s| s.criteria.perc_false_case).collect();
        let mafdist_t: Vec<f64> = self.steps.iter().map(|s| s.criteria.mafdist_t).collect();
        let mafdist_v: Vec<f64> = self.steps.iter().map(|s| s.criteria.mafdist_v).collect();

        let (objective, optimal_step) = if self.reduction_steps == 0 {
            (Vec::new(), 0)
        } else {
            let w = &self.params.weights;
            let nfc = normalize(&perc_false_case);
            let sdt = normalize(&mafdist_t);
            let sdv = normalize(&mafdist_v);
            let objective: Vec<f64> = (0..self.steps.len())
                .map(|k| weighted_norm(&[(w.nfc, nfc[k]), (w.sdt, sdt[k]), (w.sdv, sdv[k])]))
                .collect();
            let best = nan_argmin(&objective).unwrap_or(0);
            (objective, best)
        };
        self.observer.record_selection(&objective, optimal_step)?;
        debug!(optimal_step, steps = self.steps.len(), "selected coarse-graining step");

        let chosen = self.steps[optimal_step].clone();
        Ok(CoarseGrainingResult {
            obs_segments: chosen.obs_segments,
            sim_segments: chosen.sim_segments,
            distance: chosen.distance,
            objective,
            optimal_step,
            reduction_steps: self.reduction_steps,
            steps: self.steps,
            obs_statistics: self.obs_statistics,
            sim_statistics: self.sim_statistics,
            mafdist_t,
            mafdist_v,
            perc_false_case,
            timed_out: self.timed_out,
            stopped_early: self.stopped_early,
        })
    }

    /// Run all states to completion
    pub fn run(mut self) -> Result<CoarseGrainingResult> {
        self.equalize()?;
        while self.remaining_steps() > 0 {
            if self.deadline_passed() {
                warn!(
                    completed = self.steps.len() - 1,
                    planned = self.reduction_steps,
                    "deadline reached, selecting among completed steps"
                );
                self.timed_out = true;
                break;
            }
            if !self.reduce()? {
                break;
            }
        }
        self.select()
    }
}

fn gather(series: &[f64], index: &[usize], name: &str) -> Result<Vec<f64>> {
    index
        .iter()
        .map(|&i| {
            series.get(i).copied().ok_or_else(|| {
                Error::InvalidInput(format!(
                    "{name} event index {i} out of range for {} samples",
                    series.len()
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sd_core::classify_hydrological_case;
    use std::time::Duration;

    fn identity(values: &[f64]) -> Vec<usize> {
        (0..values.len()).collect()
    }

    // eight segments each
    const OBS_ZIGZAG: [f64; 9] = [0.5, 3.0, 1.0, 4.0, 2.0, 6.0, 3.0, 5.0, 1.0];
    const SIM_ZIGZAG: [f64; 10] = [0.5, 2.0, 4.0, 1.0, 5.0, 2.0, 6.0, 3.0, 4.0, 1.0];

    fn untrimmed(values: &[f64]) -> EventSeries {
        let cases = classify_hydrological_case(values).unwrap();
        EventSeries::new(values.to_vec(), &identity(values), cases).unwrap()
    }

    /// Keeps every candidate grid and the step records it is shown
    #[derive(Default)]
    struct GridRecorder {
        grids: Vec<(usize, usize, Vec<f64>)>,
        removed: Vec<Option<(usize, usize)>>,
    }

    impl CoarseGrainingObserver for GridRecorder {
        fn record_initial(&mut self, _: &[f64], _: &[Segment], _: &[f64], _: &[Segment]) -> Result<()> {
            Ok(())
        }

        fn record_candidates(&mut self, step: usize, size: usize, objective: &[f64]) -> Result<()> {
            self.grids.push((step, size, objective.to_vec()));
            Ok(())
        }

        fn record_step(&mut self, record: &StepRecord) -> Result<()> {
            self.removed.push(record.removed);
            Ok(())
        }

        fn record_selection(&mut self, _: &[f64], _: usize) -> Result<()> {
            Ok(())
        }
    }

    /// Recorder that reports itself as disabled
    #[derive(Default)]
    struct MutedRecorder(GridRecorder);

    impl CoarseGrainingObserver for MutedRecorder {
        fn record_initial(&mut self, _: &[f64], _: &[Segment], _: &[f64], _: &[Segment]) -> Result<()> {
            Ok(())
        }

        fn record_candidates(&mut self, step: usize, size: usize, objective: &[f64]) -> Result<()> {
            self.0.record_candidates(step, size, objective)
        }

        fn record_step(&mut self, record: &StepRecord) -> Result<()> {
            self.0.record_step(record)
        }

        fn record_selection(&mut self, _: &[f64], _: usize) -> Result<()> {
            Ok(())
        }

        fn is_enabled(&self) -> bool {
            false
        }
    }

    fn criteria(nfc: f64, rds: f64, sdt: f64) -> Criteria {
        Criteria { nfc, rds, sdt, sdv: 0.0 }
    }

    #[test]
    fn test_weighted_norm_skips_zero_weights() {
        assert_eq!(weighted_norm(&[(0.0, f64::NAN), (4.0, 1.0)]), 2.0);
        assert_eq!(weighted_norm(&[(1.0, 3.0), (0.0, 1.0), (1.0, 4.0)]), 5.0);
    }

    #[test]
    fn test_each_step_removes_two_segments() {
        let params = CoarseGrainingParameters::default();
        let result = coarse_grain(
            &OBS_ZIGZAG,
            &identity(&OBS_ZIGZAG),
            &SIM_ZIGZAG,
            &identity(&SIM_ZIGZAG),
            &params,
        )
        .unwrap();

        assert_eq!(result.reduction_steps, 3);
        assert_eq!(result.steps.len(), 4);
        let counts: Vec<usize> = result.steps.iter().map(|s| s.obs_segments.len()).collect();
        assert_eq!(counts, vec![8, 6, 4, 2]);
        for step in &result.steps {
            assert_eq!(step.obs_segments.len(), step.sim_segments.len());
        }
        assert_eq!(result.steps[0].removed, None);
        assert!(result.steps[1..].iter().all(|s| s.removed.is_some()));
        assert_eq!(result.objective.len(), 4);
        assert_eq!(result.mafdist_t.len(), 4);
        assert!(!result.timed_out);
        assert_eq!(result.perc_false_case[0], 0.0);
    }

    #[test]
    fn test_selected_step_is_archived() {
        let params = CoarseGrainingParameters::default();
        let result = coarse_grain(
            &OBS_ZIGZAG,
            &identity(&OBS_ZIGZAG),
            &SIM_ZIGZAG,
            &identity(&SIM_ZIGZAG),
            &params,
        )
        .unwrap();

        let chosen = &result.steps[result.optimal_step];
        assert_eq!(result.obs_segments, chosen.obs_segments);
        assert_eq!(result.sim_segments, chosen.sim_segments);
        assert_eq!(result.connectors(), chosen.connectors());
        let best = result.objective[result.optimal_step];
        assert!(result.objective.iter().all(|&v| v.is_nan() || v >= best));
    }

    #[test]
    fn test_skipped_candidates_never_win() {
        let params = CoarseGrainingParameters::default();
        let grainer = CoarseGrainer::from_series(
            &params,
            NullObserver,
            untrimmed(&OBS_ZIGZAG),
            untrimmed(&SIM_ZIGZAG),
            Instant::now(),
        )
        .unwrap();

        let cells = vec![
            None,
            Some(criteria(0.3, 0.4, 3.0)),
            Some(criteria(0.1, 0.2, 1.0)),
            None,
        ];
        let objective = grainer.score_grid(&cells);
        assert!(objective[0].is_nan());
        assert!(objective[3].is_nan());
        // skipped cells take no part in the normalization
        assert_relative_eq!(objective[1], 7.0f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(objective[2], 0.0);
        assert_eq!(nan_argmin(&objective), Some(2));

        let objective = grainer.score_grid(&[None, None, None, None]);
        assert!(objective.iter().all(|v| v.is_nan()));
        assert_eq!(nan_argmin(&objective), None);
    }

    #[test]
    fn test_unusable_magnitudes_stop_reduction() {
        // the relative magnitude error is undefined where obs and sim cancel
        let obs = [-1.0, -2.0, -1.0, 0.0, -2.0, 2.0, -2.0];
        let sim = [1.0, 2.0, -2.0, -1.0, -2.0];
        let params = CoarseGrainingParameters::magnitude_focused();
        let mut recorder = GridRecorder::default();

        let result = coarse_grain_with_observer(
            &obs,
            &identity(&obs),
            &sim,
            &identity(&sim),
            &params,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(result.reduction_steps, 1);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.completed_steps(), 0);
        assert_eq!(result.optimal_step, 0);
        assert!(result.stopped_early);
        assert!(!result.timed_out);
        assert!(result.to_string().contains("Steps: 0 of 1 (no usable merge)"));
        assert!(result.mafdist_v[0].is_nan());
        assert_eq!(result.objective.len(), 1);
        assert!(result.objective[0].is_finite());

        assert_eq!(recorder.grids.len(), 1);
        let (step, size, grid) = &recorder.grids[0];
        assert_eq!((*step, *size), (1, 2));
        assert!(grid.iter().all(|v| v.is_nan()));
        assert_eq!(recorder.removed, vec![None]);
    }

    #[test]
    fn test_applied_merge_is_grid_minimum() {
        let params = CoarseGrainingParameters::default();
        let mut recorder = GridRecorder::default();
        let result = coarse_grain_with_observer(
            &OBS_ZIGZAG,
            &identity(&OBS_ZIGZAG),
            &SIM_ZIGZAG,
            &identity(&SIM_ZIGZAG),
            &params,
            &mut recorder,
        )
        .unwrap();

        assert!(!result.stopped_early);
        assert_eq!(recorder.grids.len(), 3);
        for (step, size, grid) in &recorder.grids {
            let (obs_segment, sim_segment) = recorder.removed[*step].unwrap();
            let chosen = grid[(obs_segment - 1) * size + (sim_segment - 1)];
            assert!(chosen.is_finite());
            assert!(grid.iter().all(|&v| v.is_nan() || v >= chosen));
        }
    }

    #[test]
    fn test_disabled_observer_gets_no_grids() {
        let params = CoarseGrainingParameters::default();
        let mut muted = MutedRecorder::default();
        let result = coarse_grain_with_observer(
            &OBS_ZIGZAG,
            &identity(&OBS_ZIGZAG),
            &SIM_ZIGZAG,
            &identity(&SIM_ZIGZAG),
            &params,
            &mut muted,
        )
        .unwrap();

        assert!(muted.0.grids.is_empty());
        assert_eq!(muted.0.removed.len(), result.steps.len());
    }

    #[test]
    fn test_parity_mismatch() {
        let params = CoarseGrainingParameters::default();
        let obs = untrimmed(&[1.0, 2.0, 1.0]);
        let sim = untrimmed(&[1.0, 2.0, 1.0, 2.0]);
        let mut grainer =
            CoarseGrainer::from_series(&params, NullObserver, obs, sim, Instant::now()).unwrap();
        assert!(matches!(
            grainer.equalize(),
            Err(Error::ParityMismatch {
                obs_segments: 2,
                sim_segments: 3
            })
        ));
    }

    #[test]
    fn test_equalize_merges_the_longer_series() {
        let params = CoarseGrainingParameters::default();
        let obs = untrimmed(&OBS_ZIGZAG);
        let sim = untrimmed(&[0.5, 3.0, 1.0, 4.0, 0.5]);
        let mut grainer =
            CoarseGrainer::from_series(&params, NullObserver, obs, sim, Instant::now()).unwrap();
        grainer.equalize().unwrap();

        assert_eq!(grainer.obs.segments.len(), 4);
        assert_eq!(grainer.sim.segments.len(), 4);
        assert_eq!(grainer.reduction_steps(), 1);
        assert_eq!(grainer.steps.len(), 1);
        assert!(grainer.steps[0].criteria.perc_false_case > 0.0);
    }

    #[test]
    fn test_states_out_of_order() {
        let params = CoarseGrainingParameters::default();
        let mut grainer = CoarseGrainer::new(
            &OBS_ZIGZAG,
            &identity(&OBS_ZIGZAG),
            &SIM_ZIGZAG,
            &identity(&SIM_ZIGZAG),
            &params,
        )
        .unwrap();
        assert!(matches!(grainer.reduce(), Err(Error::InvalidInput(_))));
        grainer.equalize().unwrap();
        assert!(matches!(grainer.equalize(), Err(Error::InvalidInput(_))));

        assert!(grainer.reduce().unwrap());
        assert_eq!(grainer.remaining_steps(), 2);
        let result = grainer.select().unwrap();
        assert_eq!(result.completed_steps(), 1);
        assert_eq!(result.objective.len(), 2);
    }

    #[test]
    fn test_zero_deadline_selects_initial_state() {
        let params = CoarseGrainingParameters::default().with_deadline(Duration::ZERO);
        let result = coarse_grain(
            &OBS_ZIGZAG,
            &identity(&OBS_ZIGZAG),
            &SIM_ZIGZAG,
            &identity(&SIM_ZIGZAG),
            &params,
        )
        .unwrap();

        assert!(result.timed_out);
        assert!(!result.stopped_early);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.optimal_step, 0);
        assert_eq!(result.mafdist_t.len(), 1);
        assert_eq!(result.reduction_steps, 3);
    }

    #[test]
    fn test_event_index_maps_global_positions() {
        let mut obs = vec![9.0, 9.0, 9.0];
        obs.extend_from_slice(&OBS_ZIGZAG);
        let obs_index: Vec<usize> = (3..obs.len()).collect();
        let params = CoarseGrainingParameters::default();

        let result =
            coarse_grain(&obs, &obs_index, &SIM_ZIGZAG, &identity(&SIM_ZIGZAG), &params).unwrap();
        let initial = &result.steps[0];
        assert_eq!(initial.obs_segments[0].start_global, 3);
        assert_eq!(initial.obs_segments[0].start_local, 0);
        assert_eq!(initial.obs_segments.last().unwrap().end_global, obs.len() - 1);
    }

    #[test]
    fn test_event_index_out_of_range() {
        let params = CoarseGrainingParameters::default();
        let err = coarse_grain(&OBS_ZIGZAG, &[0, 1, 42], &SIM_ZIGZAG, &[0, 1, 2], &params);
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let params = CoarseGrainingParameters::default()
            .with_weights(ObjectiveWeights::new(0.0, 0.0, 0.0, 0.0));
        let err = coarse_grain(
            &OBS_ZIGZAG,
            &identity(&OBS_ZIGZAG),
            &SIM_ZIGZAG,
            &identity(&SIM_ZIGZAG),
            &params,
        );
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_reporting_model_differs_from_search_model() {
        let params = CoarseGrainingParameters::default().with_error_model(ErrorModel::Standard);
        let result = coarse_grain(
            &OBS_ZIGZAG,
            &identity(&OBS_ZIGZAG),
            &SIM_ZIGZAG,
            &identity(&SIM_ZIGZAG),
            &params,
        )
        .unwrap();
        assert!(result
            .steps
            .iter()
            .all(|s| s.distance.error_model == ErrorModel::Standard));
    }
}
