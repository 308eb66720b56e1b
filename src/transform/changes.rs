//! Percentage changes over a fixed row lag.

/// Month-over-month lag (rows).
pub const MOM_LAG: usize = 1;
/// Year-over-year lag (rows).
pub const YOY_LAG: usize = 12;

/// Percentage change of each row against the row `lag` positions earlier.
///
/// Row `i` is `None` when `i < lag`, when either value is missing, or when the
/// reference is zero. Rows are positional: the caller guarantees date order.
pub fn pct_change(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &current)| {
            let reference = i.checked_sub(lag).and_then(|j| values[j]);
            relative_change(current, reference)
        })
        .collect()
}

fn relative_change(current: Option<f64>, reference: Option<f64>) -> Option<f64> {
    let (current, reference) = (current?, reference?);
    if reference == 0.0 {
        return None;
    }
    let pct = (current - reference) / reference * 100.0;
    pct.is_finite().then_some(pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_row_series() {
        let values = [Some(100.0), Some(110.0)];
        let mom = pct_change(&values, MOM_LAG);
        let yoy = pct_change(&values, YOY_LAG);

        assert_eq!(mom[0], None);
        assert!((mom[1].unwrap() - 10.0).abs() < 1e-12);
        assert!(yoy.iter().all(Option::is_none));
    }

    #[test]
    fn yoy_starts_at_row_twelve() {
        let values: Vec<Option<f64>> = (0..14).map(|i| Some(100.0 + i as f64)).collect();
        let yoy = pct_change(&values, YOY_LAG);

        assert!(yoy[..12].iter().all(Option::is_none));
        assert!((yoy[12].unwrap() - 12.0).abs() < 1e-12);
        assert!((yoy[13].unwrap() - 100.0 * 12.0 / 101.0).abs() < 1e-12);
    }

    #[test]
    fn missing_values_and_zero_reference_are_undefined() {
        let values = [Some(100.0), None, Some(105.0), Some(0.0), Some(3.0)];
        let mom = pct_change(&values, MOM_LAG);

        assert_eq!(mom, vec![None, None, None, Some(-100.0), None]);
    }

    #[test]
    fn defined_iff_both_endpoints_defined() {
        let values = [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)];
        let mom = pct_change(&values, MOM_LAG);
        for i in 1..values.len() {
            let expect_defined = values[i].is_some() && values[i - 1].is_some();
            assert_eq!(mom[i].is_some(), expect_defined, "row {i}");
            if let (Some(c), Some(p)) = (values[i], values[i - 1]) {
                assert!((mom[i].unwrap() - 100.0 * (c - p) / p).abs() < 1e-12);
            }
        }
    }
}
