//! Min-max normalization of objective criteria
//!
//! NaN entries mark candidates that were never evaluated. They are ignored
//! when finding the range and stay NaN in the output.

/// Scale `values` to `[0, 1]` with `(k - min) / (max - min)`
///
/// - All-NaN input yields all zeros of the same length. A criterion that is
///   undefined everywhere (e.g. timing errors of fully shifted series) must
///   not dominate the objective.
/// - Constant input (`max == min`) maps every finite entry to 0.
///
/// # Examples
///
/// ```rust
/// use sd_core::normalize;
///
/// assert_eq!(normalize(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
/// assert_eq!(normalize(&[f64::NAN, f64::NAN]), vec![0.0, 0.0]);
/// ```
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = nan_range(values);
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        _ => return vec![0.0; values.len()],
    };

    let range = max - min;
    values
        .iter()
        .map(|&k| {
            if k.is_nan() {
                f64::NAN
            } else if range.is_nan() || range <= 0.0 {
                // constant input; min == max == inf gives a NaN range
                0.0
            } else {
                (k - min) / range
            }
        })
        .collect()
}

/// Minimum and maximum over the non-NaN entries
pub fn nan_range(values: &[f64]) -> (Option<f64>, Option<f64>) {
    values
        .iter()
        .filter(|k| !k.is_nan())
        .fold((None, None), |(min, max), &k| {
            (
                Some(min.map_or(k, |m: f64| m.min(k))),
                Some(max.map_or(k, |m: f64| m.max(k))),
            )
        })
}
