use std::collections::BTreeSet;

use crate::data::model::{LabeledSeries, NormalizedComparison, NormalizedSeries};
use crate::error::PipelineError;

/// Restrict both series to the labels they share and min-max scale each one
/// into `[0, 100]` against its own range.
///
/// The two series never share a scale: only their shapes are comparable.
pub fn normalize_comparison(
    a: &LabeledSeries,
    b: &LabeledSeries,
) -> Result<NormalizedComparison, PipelineError> {
    let in_b: BTreeSet<&str> = b.labels().collect();
    let axis: Vec<String> = a
        .labels()
        .filter(|label| in_b.contains(label))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    if axis.is_empty() {
        log::warn!("normalized comparison impossible: no shared labels");
        return Err(PipelineError::EmptyIntersection);
    }

    Ok(NormalizedComparison {
        a: restrict_and_scale(a, &axis),
        b: restrict_and_scale(b, &axis),
        axis,
    })
}

fn restrict_and_scale(source: &LabeledSeries, axis: &[String]) -> NormalizedSeries {
    // Every axis label comes from both sources, so the lookup always hits.
    let original: Vec<f64> = axis.iter().filter_map(|label| source.lookup(label)).collect();
    let constant = is_constant(&original);
    NormalizedSeries {
        normalized: normalize(&original),
        original,
        constant,
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Linear min-max scaling into `[0, 100]`.
///
/// The minimum maps to exactly 0 and the maximum to exactly 100. A constant
/// series (`max == min`) maps to all zeros. Ranges wider than `f64::MAX`
/// are scaled on halved operands.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() || max == min {
        if !values.is_empty() {
            log::debug!("degenerate range ({min}); normalizing to zeros");
        }
        return vec![0.0; values.len()];
    }

    let range = max - min;
    let fraction = |v: f64| {
        if range.is_finite() {
            (v - min) / range
        } else {
            (v / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
        }
    };
    values
        .iter()
        .map(|&v| {
            if v == min {
                0.0
            } else if v == max {
                100.0
            } else {
                (fraction(v) * 100.0).clamp(0.0, 100.0)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn series(pairs: &[(&str, f64)]) -> LabeledSeries {
        LabeledSeries::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn intersection_axis_and_independent_scales() {
        let a = series(&[("2018", 12.5), ("2019", 13.2), ("2020", 18.6)]);
        let b = series(&[("2019", 6.3), ("2020", 6.9), ("2021", 7.3)]);
        let n = normalize_comparison(&a, &b).unwrap();

        assert_eq!(n.axis, vec!["2019", "2020"]);
        assert_eq!(n.a.original, vec![13.2, 18.6]);
        assert_eq!(n.a.normalized, vec![0.0, 100.0]);
        assert_eq!(n.b.original, vec![6.3, 6.9]);
        assert_eq!(n.b.normalized, vec![0.0, 100.0]);
    }

    #[test]
    fn constant_series_normalizes_to_zero() {
        assert_eq!(normalize(&[5.0, 5.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn range_wider_than_f64_max_stays_in_bounds() {
        assert_eq!(normalize(&[-1e308, 0.0, 1e308]), vec![0.0, 50.0, 100.0]);
        assert_eq!(normalize(&[f64::MAX, -f64::MAX]), vec![100.0, 0.0]);
    }

    #[test]
    fn constant_shared_values_are_flagged() {
        let a = series(&[("2018", 9.0), ("2019", 7.0), ("2020", 7.0)]);
        let b = series(&[("2019", 1.0), ("2020", 2.0)]);
        let n = normalize_comparison(&a, &b).unwrap();
        assert!(n.a.constant);
        assert_eq!(n.a.normalized, vec![0.0, 0.0]);
        assert!(!n.b.constant);
    }

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn midpoint_scales_linearly() {
        assert_eq!(normalize(&[10.0, 15.0, 20.0]), vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn no_shared_labels_is_empty_intersection() {
        let a = series(&[("2010", 1.0)]);
        let b = series(&[("2011", 2.0)]);
        assert!(matches!(
            normalize_comparison(&a, &b),
            Err(PipelineError::EmptyIntersection)
        ));
    }

    #[test]
    fn duplicates_use_first_occurrence() {
        let a = series(&[("2019", 1.0), ("2020", 2.0), ("2019", 50.0)]);
        let b = series(&[("2020", 4.0), ("2019", 3.0)]);
        let n = normalize_comparison(&a, &b).unwrap();
        assert_eq!(n.axis, vec!["2019", "2020"]);
        assert_eq!(n.a.original, vec![1.0, 2.0]);
        assert_eq!(n.b.original, vec![3.0, 4.0]);
    }

    fn arb_series() -> impl Strategy<Value = LabeledSeries> {
        prop::collection::vec((2000u32..2015, -1e6f64..1e6), 0..12).prop_map(|pairs| {
            LabeledSeries::from_pairs(pairs.into_iter().map(|(y, v)| (y.to_string(), v)))
        })
    }

    fn finite() -> impl Strategy<Value = f64> {
        use prop::num::f64::{NEGATIVE, NORMAL, POSITIVE, ZERO};
        POSITIVE | NEGATIVE | NORMAL | ZERO
    }

    proptest! {
        #[test]
        fn axis_is_sorted_intersection(a in arb_series(), b in arb_series()) {
            let la: BTreeSet<&str> = a.labels().collect();
            let lb: BTreeSet<&str> = b.labels().collect();
            let expected: Vec<&str> = la.intersection(&lb).copied().collect();

            match normalize_comparison(&a, &b) {
                Ok(n) => {
                    prop_assert_eq!(n.axis.iter().map(String::as_str).collect::<Vec<_>>(), expected);
                    prop_assert_eq!(n.a.original.len(), n.axis.len());
                    prop_assert_eq!(n.b.normalized.len(), n.axis.len());
                }
                Err(e) => {
                    prop_assert!(matches!(e, PipelineError::EmptyIntersection));
                    prop_assert!(expected.is_empty());
                }
            }
        }

        #[test]
        fn scaled_values_span_zero_to_hundred(values in prop::collection::vec(finite(), 1..20)) {
            let scaled = normalize(&values);
            prop_assert_eq!(scaled.len(), values.len());
            prop_assert!(scaled.iter().all(|v| (0.0..=100.0).contains(v)));

            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for (v, s) in values.iter().zip(&scaled) {
                if min == max {
                    prop_assert_eq!(*s, 0.0);
                } else if *v == min {
                    prop_assert_eq!(*s, 0.0);
                } else if *v == max {
                    prop_assert_eq!(*s, 100.0);
                }
            }
        }

        #[test]
        fn constant_series_never_nan(v in -1e6f64..1e6, n in 1usize..10) {
            let scaled = normalize(&vec![v; n]);
            prop_assert!(scaled.iter().all(|s| *s == 0.0));
        }
    }
}
