//! Types used for hydrograph segmentation

use sd_core::utils::{sum_abs_diff, sum_diff};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// A monotonic rise or fall section of a hydrograph
///
/// Local indices address the (trimmed) series the segment was defined on,
/// global indices address the original, untrimmed series. Both are kept
/// explicitly; neither is derived from the other. Ranges are inclusive, so
/// neighbouring segments share their peak or valley sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First sample, local index
    pub start_local: usize,
    /// Last sample, local index
    pub end_local: usize,
    /// First sample, global index
    pub start_global: usize,
    /// Last sample, global index
    pub end_global: usize,
    /// `end_local - start_local`
    pub length: usize,
    /// Length relative to the whole series, `length / (N - 1)`
    pub rel_length: f64,
    /// Signed net change over the segment
    pub sum_dq: f64,
    /// Absolute change relative to the absolute change of the whole series
    pub rel_dq: f64,
    /// Relevance, normalized over all segments of the series
    pub relevance: f64,
}

impl Segment {
    /// Build a segment over `[start_local, end_local]` of `values` and
    /// compute its statistics
    ///
    /// `total_abs_dq` is the sum of absolute differences of the whole
    /// series. `relevance` is set to the un-normalized Euclidean norm of
    /// `(rel_length, rel_dq)`.
    pub fn spanning(
        values: &[f64],
        total_abs_dq: f64,
        start_local: usize,
        end_local: usize,
        start_global: usize,
        end_global: usize,
    ) -> Self {
        let n = values.len();
        let window = &values[start_local..=end_local];
        let length = end_local - start_local;
        let rel_length = if n > 1 {
            length as f64 / (n - 1) as f64
        } else {
            0.0
        };
        let rel_dq = if total_abs_dq > 0.0 {
            sum_abs_diff(window) / total_abs_dq
        } else {
            0.0
        };

        Self {
            start_local,
            end_local,
            start_global,
            end_global,
            length,
            rel_length,
            sum_dq: sum_diff(window),
            rel_dq,
            relevance: rel_length.hypot(rel_dq),
        }
    }

    /// Whether the segment is rising (positive net change)
    ///
    /// Flat segments count as falling.
    pub fn is_rise(&self) -> bool {
        self.sum_dq > 0.0
    }

    /// Local sample range covered by the segment
    pub fn local_range(&self) -> RangeInclusive<usize> {
        self.start_local..=self.end_local
    }

    /// Global sample range covered by the segment
    pub fn global_range(&self) -> RangeInclusive<usize> {
        self.start_global..=self.end_global
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment {{ {} [{}..={}], global [{}..={}], relevance: {:.3} }}",
            if self.is_rise() { "rise" } else { "fall" },
            self.start_local,
            self.end_local,
            self.start_global,
            self.end_global,
            self.relevance
        )
    }
}

/// Summary statistics of a segmentation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentStatistics {
    /// Number of rising segments
    pub rising: usize,
    /// Number of falling segments (flat segments are in neither count)
    pub falling: usize,
    /// Total length of rising segments
    pub rise_duration: usize,
    /// Total length of falling segments
    pub fall_duration: usize,
    /// Global distance from the first segment's start to the last one's end
    pub total_duration: usize,
}

impl SegmentStatistics {
    /// Summarize a segmentation
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut stats = Self::default();
        for seg in segments {
            if seg.sum_dq > 0.0 {
                stats.rising += 1;
                stats.rise_duration += seg.length;
            } else if seg.sum_dq < 0.0 {
                stats.falling += 1;
                stats.fall_duration += seg.length;
            }
        }
        if let (Some(first), Some(last)) = (segments.first(), segments.last()) {
            stats.total_duration = last.end_global.saturating_sub(first.start_global);
        }
        stats
    }
}

/// Summarize a segmentation, see [`SegmentStatistics`]
pub fn segment_statistics(segments: &[Segment]) -> SegmentStatistics {
    SegmentStatistics::from_segments(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spanning_statistics() {
        let values = [1.0, 2.0, 4.0, 3.0, 1.0];
        let total = sum_abs_diff(&values);
        let seg = Segment::spanning(&values, total, 0, 2, 10, 12);

        assert_eq!(seg.length, 2);
        assert_relative_eq!(seg.rel_length, 0.5);
        assert_relative_eq!(seg.sum_dq, 3.0);
        assert_relative_eq!(seg.rel_dq, 0.5);
        assert_relative_eq!(seg.relevance, 0.5f64.hypot(0.5));
        assert!(seg.is_rise());
        assert_eq!(seg.global_range(), 10..=12);
    }

    #[test]
    fn test_flat_series_has_zero_rel_dq() {
        let values = [2.0, 2.0, 2.0];
        let seg = Segment::spanning(&values, 0.0, 0, 2, 0, 2);
        assert_eq!(seg.rel_dq, 0.0);
        assert!(!seg.is_rise());
    }

    #[test]
    fn test_segment_statistics() {
        let values = [1.0, 3.0, 2.0, 2.0, 5.0];
        let total = sum_abs_diff(&values);
        let segs = vec![
            Segment::spanning(&values, total, 0, 1, 4, 5),
            Segment::spanning(&values, total, 1, 2, 5, 6),
            Segment::spanning(&values, total, 2, 3, 6, 7),
            Segment::spanning(&values, total, 3, 4, 7, 8),
        ];
        let stats = segment_statistics(&segs);
        assert_eq!(stats.rising, 2);
        assert_eq!(stats.falling, 1);
        assert_eq!(stats.rise_duration, 2);
        assert_eq!(stats.fall_duration, 1);
        assert_eq!(stats.total_duration, 4);
    }

    #[test]
    fn test_empty_statistics() {
        assert_eq!(segment_statistics(&[]), SegmentStatistics::default());
    }
}
