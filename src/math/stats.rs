//! Sample statistics.
//!
//! Columns in this crate are `Option<f64>` per row. The helpers here operate on
//! already-filtered finite values; callers decide what counts as defined.

/// Collect the defined, finite values of a column.
pub fn defined_values(column: &[Option<f64>]) -> Vec<f64> {
    column
        .iter()
        .filter_map(|v| *v)
        .filter(|v| v.is_finite())
        .collect()
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// Returns `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let n = values.len() as f64;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_std_uses_n_minus_one() {
        // 2, 4, 4, 4, 5, 5, 7, 9: population std = 2, sample std = sqrt(32/7)
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v).unwrap() - 5.0).abs() < 1e-12);
        assert!((sample_std(&v).unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(sample_std(&[3.0, 3.0, 3.0]), Some(0.0));
    }

    #[test]
    fn defined_values_skips_missing_and_non_finite() {
        let col = [Some(1.0), None, Some(f64::NAN), Some(2.5), Some(f64::INFINITY)];
        assert_eq!(defined_values(&col), vec![1.0, 2.5]);
    }
}
