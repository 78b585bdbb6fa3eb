//! Pre-processing of raw hydrographs before segmentation

/// Increment applied per step inside a run of equal neighbours
pub const EQUAL_NEIGHBOUR_STEP: f64 = 1e-4;

/// Break ties between equal neighbouring values
///
/// Inside every run of equal values, each value is raised to its
/// predecessor plus [`EQUAL_NEIGHBOUR_STEP`], so the last value of a run is
/// the largest. Plateaus would otherwise yield segments whose net change is
/// zero. Returns the adjusted series and the number of values changed.
///
/// # Examples
///
/// ```rust
/// use sd_core::replace_equal_neighbours;
///
/// let (vals, changed) = replace_equal_neighbours(&[1.0, 2.0, 2.0, 1.0]);
/// assert_eq!(changed, 1);
/// assert!(vals[2] > vals[1]);
/// ```
pub fn replace_equal_neighbours(values: &[f64]) -> (Vec<f64>, usize) {
    let mut out = values.to_vec();
    let mut changed = 0;
    let mut z = 0;
    while z + 1 < out.len() {
        if out[z] == out[z + 1] {
            let run_value = out[z];
            let mut k = z + 1;
            while k < out.len() && out[k] == run_value {
                out[k] = out[k - 1] + EQUAL_NEIGHBOUR_STEP;
                changed += 1;
                k += 1;
            }
            z = k;
        } else {
            z += 1;
        }
    }
    (out, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_ties_unchanged() {
        let (vals, changed) = replace_equal_neighbours(&[1.0, 2.0, 1.0]);
        assert_eq!(vals, vec![1.0, 2.0, 1.0]);
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_run_is_strictly_increasing() {
        let (vals, changed) = replace_equal_neighbours(&[0.0, 5.0, 5.0, 5.0, 1.0]);
        assert_eq!(changed, 2);
        assert_relative_eq!(vals[2], 5.0001, epsilon = 1e-12);
        assert_relative_eq!(vals[3], 5.0002, epsilon = 1e-12);
        assert_eq!(vals[4], 1.0);
    }

    #[test]
    fn test_separate_runs() {
        let (vals, changed) = replace_equal_neighbours(&[1.0, 1.0, 3.0, 3.0]);
        assert_eq!(changed, 2);
        assert!(vals[1] > vals[0]);
        assert!(vals[3] > vals[2]);
    }

    #[test]
    fn test_short_inputs() {
        assert_eq!(replace_equal_neighbours(&[]), (vec![], 0));
        assert_eq!(replace_equal_neighbours(&[4.0]), (vec![4.0], 0));
    }
}
