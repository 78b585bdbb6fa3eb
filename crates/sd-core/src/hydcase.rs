//! Hydrological case classification
//!
//! Every sample of a hydrograph is labelled from the signs of the slopes to
//! its neighbours. A slope counts as falling only when it is strictly
//! negative, so flat steps are treated as rising and every sample receives
//! exactly one case.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hydrological case of a single sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum HydCase {
    /// Falling into the sample, rising out of it
    Valley = -2,
    /// Falling on both sides
    Drop = -1,
    /// Rising on both sides
    Rise = 1,
    /// Rising into the sample, falling out of it
    Peak = 2,
}

impl HydCase {
    /// Numeric code used by hydrological tooling (-2, -1, 1, 2)
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Whether this is a turning point (peak or valley)
    pub fn is_turning_point(self) -> bool {
        matches!(self, HydCase::Peak | HydCase::Valley)
    }

    fn from_slopes(falling_in: bool, falling_out: bool) -> Self {
        match (falling_in, falling_out) {
            (true, false) => HydCase::Valley,
            (true, true) => HydCase::Drop,
            (false, false) => HydCase::Rise,
            (false, true) => HydCase::Peak,
        }
    }
}

impl fmt::Display for HydCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HydCase::Valley => write!(f, "valley"),
            HydCase::Drop => write!(f, "drop"),
            HydCase::Rise => write!(f, "rise"),
            HydCase::Peak => write!(f, "peak"),
        }
    }
}

/// Classify every sample of `values` into a [`HydCase`]
///
/// The first and last samples only see one neighbour and are therefore
/// always `Rise` or `Drop`.
///
/// # Examples
///
/// ```rust
/// use sd_core::{classify_hydrological_case, HydCase};
///
/// let cases = classify_hydrological_case(&[1.0, 3.0, 2.0, 4.0]).unwrap();
/// assert_eq!(cases, vec![HydCase::Rise, HydCase::Peak, HydCase::Valley, HydCase::Rise]);
/// ```
pub fn classify_hydrological_case(values: &[f64]) -> Result<Vec<HydCase>> {
    let n = values.len();
    if n < 2 {
        return Err(Error::too_short(n));
    }

    let mut cases = Vec::with_capacity(n);
    cases.push(boundary_case(values[0], values[1]));
    for z in 1..n - 1 {
        let falling_in = values[z] - values[z - 1] < 0.0;
        let falling_out = values[z + 1] - values[z] < 0.0;
        cases.push(HydCase::from_slopes(falling_in, falling_out));
    }
    cases.push(boundary_case(values[n - 2], values[n - 1]));

    Ok(cases)
}

#[inline]
fn boundary_case(from: f64, to: f64) -> HydCase {
    if to - from < 0.0 {
        HydCase::Drop
    } else {
        HydCase::Rise
    }
}
