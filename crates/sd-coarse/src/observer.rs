//! Observation hooks for the coarse-graining search
//!
//! Plotting or diagnostic consumers implement [`CoarseGrainingObserver`] to
//! follow the search step by step. The optimizer is generic over the
//! observer, so the default [`NullObserver`] compiles away entirely.

use crate::types::StepRecord;
use sd_core::Result;
use sd_segments::Segment;

/// Hooks called by the optimizer at the end of each state
pub trait CoarseGrainingObserver {
    /// Record the trimmed series and their initial segmentation
    fn record_initial(
        &mut self,
        obs: &[f64],
        obs_segments: &[Segment],
        sim: &[f64],
        sim_segments: &[Segment],
    ) -> Result<()>;

    /// Record the objective values of all candidate merges of one step
    ///
    /// `objective` is a row-major `size x size` grid over the interior
    /// (observed, simulated) segment indices; skipped candidates are NaN.
    fn record_candidates(&mut self, step: usize, size: usize, objective: &[f64]) -> Result<()>;

    /// Record a completed step, including the equalized initial state
    /// (step 0)
    fn record_step(&mut self, record: &StepRecord) -> Result<()>;

    /// Record the objective trace and the selected step
    fn record_selection(&mut self, objective: &[f64], optimal_step: usize) -> Result<()>;

    /// Check if this observer is active
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Observer that does nothing
#[derive(Default, Clone, Copy, Debug)]
pub struct NullObserver;

impl CoarseGrainingObserver for NullObserver {
    #[inline(always)]
    fn record_initial(&mut self, _: &[f64], _: &[Segment], _: &[f64], _: &[Segment]) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    fn record_candidates(&mut self, _: usize, _: usize, _: &[f64]) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    fn record_step(&mut self, _: &StepRecord) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    fn record_selection(&mut self, _: &[f64], _: usize) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    fn is_enabled(&self) -> bool {
        false
    }
}

impl<O: CoarseGrainingObserver + ?Sized> CoarseGrainingObserver for &mut O {
    fn record_initial(
        &mut self,
        obs: &[f64],
        obs_segments: &[Segment],
        sim: &[f64],
        sim_segments: &[Segment],
    ) -> Result<()> {
        (**self).record_initial(obs, obs_segments, sim, sim_segments)
    }

    fn record_candidates(&mut self, step: usize, size: usize, objective: &[f64]) -> Result<()> {
        (**self).record_candidates(step, size, objective)
    }

    fn record_step(&mut self, record: &StepRecord) -> Result<()> {
        (**self).record_step(record)
    }

    fn record_selection(&mut self, objective: &[f64], optimal_step: usize) -> Result<()> {
        (**self).record_selection(objective, optimal_step)
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}
