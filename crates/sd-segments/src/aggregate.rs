//! Segment aggregation
//!
//! Removes one segment from a segmentation by merging it into its
//! neighbours. The first and last segments are protected while more than
//! two segments remain, so the series keeps its start and end case.
//!
//! Removing an interior segment merges the previous, the removed and the
//! next segment into one, which shrinks the list by two. Equalization and
//! the coarse-graining step count (`count / 2 - 1`) both depend on this,
//! and `tests::test_interior_removal_shrinks_by_two` pins it.

use crate::types::Segment;
use sd_core::utils::{nan_argmin, sum_abs_diff};
use sd_core::{Error, HydCase, Result};
use std::ops::Range;

/// Remove `target` (or the least relevant segment) by merging it into its
/// neighbour(s)
///
/// Returns the new segment list and the updated case array. The inputs are
/// not modified.
///
/// Without a target, the least relevant interior segment is removed when
/// more than two segments remain, otherwise the less relevant of the two.
/// The first minimum wins ties.
///
/// The case span `[start_local, end_local)` of the removed segment takes
/// the case of the absorbing neighbour: the sample after the shared end
/// point when the first segment is removed, the sample before the shared
/// start point otherwise. Cases outside that span are left as they are.
///
/// # Errors
///
/// - [`Error::TooFewSegments`] for fewer than two segments
/// - [`Error::ProtectedBoundarySegment`] when `target` is the first or last
///   segment while more than two remain
/// - [`Error::InvalidInput`] for an out-of-range target or mismatched
///   case/value lengths
pub fn aggregate_segment(
    segments: &[Segment],
    cases: &[HydCase],
    values: &[f64],
    target: Option<usize>,
) -> Result<(Vec<Segment>, Vec<HydCase>)> {
    let n = segments.len();
    if n < 2 {
        return Err(Error::TooFewSegments { actual: n });
    }
    if cases.len() != values.len() {
        return Err(Error::size_mismatch(values.len(), cases.len(), "case array"));
    }
    if segments.iter().any(|s| s.end_local >= values.len()) {
        return Err(Error::InvalidInput(
            "segment extends beyond the value array".to_string(),
        ));
    }

    let target = match target {
        Some(t) if t >= n => {
            return Err(Error::InvalidInput(format!(
                "segment index {t} out of range for {n} segments"
            )))
        }
        Some(t) if n > 2 && (t == 0 || t == n - 1) => {
            return Err(Error::ProtectedBoundarySegment {
                index: t,
                segments: n,
            })
        }
        Some(t) => t,
        None => least_relevant(segments),
    };

    let total_abs_dq = sum_abs_diff(values);
    let removed = segments[target];
    let span = removed.start_local..removed.end_local;
    let mut new_cases = cases.to_vec();
    let mut new_segments = segments.to_vec();

    if target == 0 {
        let next = segments[1];
        let fill = cases
            .get(removed.end_local + 1)
            .copied()
            .unwrap_or(cases[removed.end_local]);
        fill_span(&mut new_cases, span, fill);

        let mut merged = Segment::spanning(
            values,
            total_abs_dq,
            removed.start_local,
            next.end_local,
            removed.start_global,
            next.end_global,
        );
        merged.relevance = removed.relevance + next.relevance;
        new_segments.splice(0..2, [merged]);
    } else if target == n - 1 {
        let prev = segments[n - 2];
        let fill = cases[removed.start_local.saturating_sub(1)];
        fill_span(&mut new_cases, span, fill);

        let mut merged = Segment::spanning(
            values,
            total_abs_dq,
            prev.start_local,
            removed.end_local,
            prev.start_global,
            removed.end_global,
        );
        merged.relevance = prev.relevance + removed.relevance;
        new_segments.splice(n - 2..n, [merged]);
    } else {
        let prev = segments[target - 1];
        let next = segments[target + 1];
        let fill = cases[removed.start_local.saturating_sub(1)];
        fill_span(&mut new_cases, span, fill);

        let mut merged = Segment::spanning(
            values,
            total_abs_dq,
            prev.start_local,
            next.end_local,
            prev.start_global,
            next.end_global,
        );
        merged.relevance = prev.relevance + removed.relevance + next.relevance;
        new_segments.splice(target - 1..target + 2, [merged]);
    }

    Ok((new_segments, new_cases))
}

/// Index of the segment removed when no explicit target is given
fn least_relevant(segments: &[Segment]) -> usize {
    let n = segments.len();
    let relevance: Vec<f64> = segments.iter().map(|s| s.relevance).collect();
    if n > 2 {
        nan_argmin(&relevance[1..n - 1]).map_or(1, |i| i + 1)
    } else {
        nan_argmin(&relevance).unwrap_or(0)
    }
}

fn fill_span(cases: &mut [HydCase], span: Range<usize>, fill: HydCase) {
    for case in &mut cases[span] {
        *case = fill;
    }
}
