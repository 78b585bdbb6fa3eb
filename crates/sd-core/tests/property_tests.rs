//! Property-based tests for classification and normalization

use proptest::prelude::*;
use sd_core::{classify_hydrological_case, normalize, HydCase};

proptest! {
    // Property: every index gets a case, boundaries only rise or drop
    #[test]
    fn prop_classification_covers_every_sample(
        values in prop::collection::vec(-100.0f64..100.0, 2..200)
    ) {
        let cases = classify_hydrological_case(&values).unwrap();
        prop_assert_eq!(cases.len(), values.len());
        prop_assert!(matches!(cases[0], HydCase::Rise | HydCase::Drop));
        prop_assert!(matches!(cases[cases.len() - 1], HydCase::Rise | HydCase::Drop));
    }

    // Property: classification is deterministic
    #[test]
    fn prop_classification_deterministic(
        values in prop::collection::vec(-10.0f64..10.0, 2..50)
    ) {
        let a = classify_hydrological_case(&values).unwrap();
        let b = classify_hydrological_case(&values).unwrap();
        prop_assert_eq!(a, b);
    }

    // Property: finite non-constant input maps onto [0, 1] with both ends hit
    #[test]
    fn prop_normalize_range(
        values in prop::collection::vec(-1e6f64..1e6, 2..100)
    ) {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assume!(max > min);

        let out = normalize(&values);
        prop_assert_eq!(out.len(), values.len());
        for (&k, &o) in values.iter().zip(out.iter()) {
            prop_assert!((0.0..=1.0).contains(&o));
            if k == min {
                prop_assert_eq!(o, 0.0);
            }
            if k == max {
                prop_assert!((o - 1.0).abs() < 1e-12);
            }
        }
    }

    // Property: all-NaN input maps to all zeros
    #[test]
    fn prop_normalize_all_nan(len in 0usize..50) {
        let out = normalize(&vec![f64::NAN; len]);
        prop_assert_eq!(out, vec![0.0; len]);
    }
}
