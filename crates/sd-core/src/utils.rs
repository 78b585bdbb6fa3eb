//! Utility functions for working with data slices

/// `num` evenly spaced points over `[start, end]`, both ends included
///
/// Returns an empty vector for `num == 0` and `[start]` for `num == 1`.
///
/// # Examples
///
/// ```rust
/// use sd_core::utils::linspace;
///
/// assert_eq!(linspace(0.0, 4.0, 5), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(linspace(2.0, 8.0, 1), vec![2.0]);
/// ```
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`
///
/// `xp` must be ascending. Values outside `xp` are clamped to the end
/// values. Returns NaN if `xp` is empty.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    let n = xp.len();
    if n == 0 {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // first index with xp[i] > x; lies in 1..n
    let i = xp.partition_point(|&v| v <= x);
    let (x0, x1) = (xp[i - 1], xp[i]);
    let (f0, f1) = (fp[i - 1], fp[i]);
    if x1 == x0 {
        return f0;
    }
    f0 + (f1 - f0) * (x - x0) / (x1 - x0)
}

/// Mean of absolute values
///
/// Returns `None` for empty slices. NaN entries propagate.
///
/// # Examples
///
/// ```rust
/// use sd_core::utils::mean_abs;
///
/// assert_eq!(mean_abs(&[-1.0, 3.0]), Some(2.0));
/// assert_eq!(mean_abs(&[]), None);
/// ```
pub fn mean_abs(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().map(|x| x.abs()).sum::<f64>() / data.len() as f64)
}

/// Index of the smallest non-NaN value; the first one wins ties
pub fn nan_argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Signed sum of consecutive differences (`last - first` up to rounding)
pub fn sum_diff(values: &[f64]) -> f64 {
    values.windows(2).map(|w| w[1] - w[0]).sum()
}

/// Sum of absolute consecutive differences
pub fn sum_abs_diff(values: &[f64]) -> f64 {
    values.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
}

/// Round half to even, the convention of numerical array libraries
///
/// Negative and non-finite inputs map to zero.
pub fn round_count(x: f64) -> usize {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    x.round_ties_even() as usize
}
