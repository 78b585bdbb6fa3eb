//! Segment definition at peaks and valleys

use crate::types::Segment;
use sd_core::utils::sum_abs_diff;
use sd_core::{classify_hydrological_case, Error, Result};
use tracing::trace;

/// Split a series into segments at every interior peak and valley
///
/// `positions` holds the global index of each sample in `values`. Turning
/// points close the current segment and open the next one, so they belong
/// to both. A series without interior turning points yields one segment.
/// Relevances are renormalized to sum to 1.
///
/// # Examples
///
/// ```rust
/// use sd_segments::define_segments;
///
/// let values = [1.0, 2.0, 3.0, 2.0, 1.0];
/// let positions: Vec<usize> = (100..105).collect();
/// let segs = define_segments(&positions, &values).unwrap();
///
/// assert_eq!(segs.len(), 2);
/// assert_eq!(segs[0].end_local, 2);
/// assert_eq!(segs[1].start_global, 102);
/// ```
pub fn define_segments(positions: &[usize], values: &[f64]) -> Result<Vec<Segment>> {
    let n = values.len();
    if positions.len() != n {
        return Err(Error::size_mismatch(n, positions.len(), "segment positions"));
    }
    let cases = classify_hydrological_case(values)?;
    let total_abs_dq = sum_abs_diff(values);

    let mut segments = Vec::new();
    let mut start = 0;
    for z in 1..n - 1 {
        if cases[z].is_turning_point() {
            segments.push(Segment::spanning(
                values,
                total_abs_dq,
                start,
                z,
                positions[start],
                positions[z],
            ));
            start = z;
        }
    }
    segments.push(Segment::spanning(
        values,
        total_abs_dq,
        start,
        n - 1,
        positions[start],
        positions[n - 1],
    ));

    renormalize_relevance(&mut segments);
    trace!(samples = n, segments = segments.len(), "defined segments");
    Ok(segments)
}

/// Scale relevances so they sum to 1
///
/// Leaves the segments untouched when the total is zero or not finite.
/// Applying it twice gives the same result as applying it once.
pub fn renormalize_relevance(segments: &mut [Segment]) {
    let total: f64 = segments.iter().map(|s| s.relevance).sum();
    if total > 0.0 && total.is_finite() {
        for seg in segments.iter_mut() {
            seg.relevance /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn local(values: &[f64]) -> Vec<Segment> {
        let positions: Vec<usize> = (0..values.len()).collect();
        define_segments(&positions, values).unwrap()
    }

    #[test]
    fn test_segments_share_turning_points() {
        let segs = local(&[1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 4.0, 3.0, 1.0]);
        let bounds: Vec<(usize, usize)> =
            segs.iter().map(|s| (s.start_local, s.end_local)).collect();
        assert_eq!(bounds, vec![(0, 2), (2, 4), (4, 6), (6, 8)]);

        let kinds: Vec<bool> = segs.iter().map(|s| s.is_rise()).collect();
        assert_eq!(kinds, vec![true, false, true, false]);
    }

    #[test]
    fn test_monotone_series_is_one_segment() {
        let segs = local(&[1.0, 2.0, 3.0, 5.0]);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].start_local, 0);
        assert_eq!(segs[0].end_local, 3);
        assert_relative_eq!(segs[0].relevance, 1.0);
    }

    #[test]
    fn test_relevance_sums_to_one() {
        let segs = local(&[0.0, 4.0, 1.0, 2.0, 0.5, 3.0]);
        let total: f64 = segs.iter().map(|s| s.relevance).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_relevance_combines_length_and_change() {
        // two segments of equal length; the second changes three times as much
        let segs = local(&[0.0, 1.0, 2.0, -1.0, -4.0]);
        assert_eq!(segs.len(), 2);
        let raw0 = 0.5f64.hypot(2.0 / 8.0);
        let raw1 = 0.5f64.hypot(6.0 / 8.0);
        assert_relative_eq!(segs[0].relevance, raw0 / (raw0 + raw1), epsilon = 1e-12);
        assert_relative_eq!(segs[1].relevance, raw1 / (raw0 + raw1), epsilon = 1e-12);
    }

    #[test]
    fn test_global_positions_follow_offsets() {
        let positions = [7, 8, 9, 10];
        let segs = define_segments(&positions, &[1.0, 3.0, 2.0, 0.0]).unwrap();
        assert_eq!(segs[0].global_range(), 7..=8);
        assert_eq!(segs[1].global_range(), 8..=10);
    }

    #[test]
    fn test_renormalize_idempotent() {
        let mut segs = local(&[0.0, 4.0, 1.0, 2.0, 0.5, 3.0]);
        let once = segs.clone();
        renormalize_relevance(&mut segs);
        for (a, b) in once.iter().zip(segs.iter()) {
            assert_relative_eq!(a.relevance, b.relevance, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            define_segments(&[0], &[1.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            define_segments(&[0, 1, 2], &[1.0, 2.0]),
            Err(Error::InvalidInput(_))
        ));
    }
}
