//! CPI transform pipeline.
//!
//! `compute_metrics` is the single entry point and is a pure function of its
//! inputs: pivot → percentage changes → heat score → alert flag. Front-ends call
//! it again in full whenever thresholds or data change.

use tracing::debug;

use crate::domain::{
    DerivedRow, DerivedTable, FOOD_CPI, GENERAL_CPI, Observation, TRACKED_INDICATORS, Thresholds,
};

pub mod align;
pub mod changes;
pub mod heat;

pub use align::align;
pub use changes::{MOM_LAG, YOY_LAG, pct_change};
pub use heat::heat_scores;

/// Run the full pipeline over raw observations.
pub fn compute_metrics(observations: &[Observation], thresholds: &Thresholds) -> DerivedTable {
    let aligned = align(observations, &TRACKED_INDICATORS);

    let food = tracked_column(&aligned, FOOD_CPI);
    let general = tracked_column(&aligned, GENERAL_CPI);

    let food_mom = pct_change(&food, MOM_LAG);
    let food_yoy = pct_change(&food, YOY_LAG);
    let general_mom = pct_change(&general, MOM_LAG);
    let general_yoy = pct_change(&general, YOY_LAG);

    let (heat, moments) = heat_scores(&food_yoy, &food_mom);

    let rows: Vec<DerivedRow> = aligned
        .dates
        .iter()
        .enumerate()
        .map(|(i, &date)| DerivedRow {
            date,
            food_cpi: food[i],
            general_cpi: general[i],
            food_cpi_mom_pct: food_mom[i],
            food_cpi_yoy_pct: food_yoy[i],
            general_cpi_mom_pct: general_mom[i],
            general_cpi_yoy_pct: general_yoy[i],
            heat: heat[i],
            alert: is_alert(food_yoy[i], food_mom[i], thresholds),
        })
        .collect();

    debug!(
        rows = rows.len(),
        alerts = rows.iter().filter(|r| r.alert).count(),
        yoy_threshold = thresholds.yoy,
        mom_threshold = thresholds.mom,
        "computed CPI metrics"
    );

    DerivedTable {
        rows,
        indicators: aligned.indicators().map(str::to_string).collect(),
        thresholds: *thresholds,
        moments,
    }
}

/// Both changes must be defined and strictly above their thresholds.
pub fn is_alert(yoy: Option<f64>, mom: Option<f64>, thresholds: &Thresholds) -> bool {
    matches!((yoy, mom), (Some(y), Some(m)) if y > thresholds.yoy && m > thresholds.mom)
}

fn tracked_column(aligned: &crate::domain::AlignedTable, name: &str) -> Vec<Option<f64>> {
    aligned
        .column(name)
        .map(<[Option<f64>]>::to_vec)
        .unwrap_or_else(|| vec![None; aligned.len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, NaiveDate};

    fn monthly(indicator: &str, values: &[f64]) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| Observation {
                area: Some("Saudi Arabia".to_string()),
                indicator: indicator.to_string(),
                date: start + Months::new(i as u32),
                value,
            })
            .collect()
    }

    #[test]
    fn alert_requires_both_defined_and_strictly_above() {
        let t = Thresholds { yoy: 3.0, mom: 0.6 };
        assert!(is_alert(Some(3.1), Some(0.7), &t));
        assert!(!is_alert(Some(3.0), Some(0.7), &t));
        assert!(!is_alert(Some(3.1), Some(0.6), &t));
        assert!(!is_alert(None, Some(9.0), &t));
        assert!(!is_alert(Some(9.0), None, &t));
    }

    #[test]
    fn constant_series_has_zero_changes_and_heat() {
        let obs = monthly(FOOD_CPI, &[150.0; 13]);
        let table = compute_metrics(&obs, &Thresholds::default());

        assert_eq!(table.len(), 13);
        for row in &table.rows[1..] {
            assert_eq!(row.food_cpi_mom_pct, Some(0.0));
        }
        assert_eq!(table.rows[12].food_cpi_yoy_pct, Some(0.0));
        assert!(table.rows.iter().filter_map(|r| r.heat).all(|h| h.abs() < 1e-9));
        assert!(table.rows[12].heat.is_some());
        assert_eq!(table.alerts().count(), 0);
    }

    #[test]
    fn missing_general_column_stays_undefined() {
        let obs = monthly(FOOD_CPI, &[100.0, 110.0]);
        let table = compute_metrics(&obs, &Thresholds::default());

        assert!(table.indicators.iter().any(|i| i == GENERAL_CPI));
        assert!(table.rows.iter().all(|r| r.general_cpi.is_none()));
        assert!((table.rows[1].food_cpi_mom_pct.unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(table.rows[1].food_cpi_yoy_pct, None);
    }

    #[test]
    fn flat_general_series_has_zero_changes_and_leaves_alerts_alone() {
        let food: Vec<f64> = (0..14).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let food_only = monthly(FOOD_CPI, &food);
        let mut both = food_only.clone();
        both.extend(monthly(GENERAL_CPI, &[100.0; 14]));

        let t = Thresholds::default();
        let base = compute_metrics(&food_only, &t);
        let table = compute_metrics(&both, &t);

        assert_eq!(table.rows[0].general_cpi_mom_pct, None);
        for row in &table.rows[1..] {
            assert_eq!(row.general_cpi_mom_pct, Some(0.0));
        }
        for (i, row) in table.rows.iter().enumerate() {
            let expected = (i >= 12).then_some(0.0);
            assert_eq!(row.general_cpi_yoy_pct, expected);
        }

        let flagged: Vec<usize> = table.rows.iter().enumerate().filter(|(_, r)| r.alert).map(|(i, _)| i).collect();
        assert_eq!(flagged, [12, 13]);
        for (a, b) in base.rows.iter().zip(&table.rows) {
            assert_eq!(a.alert, b.alert);
            assert_eq!(a.heat, b.heat);
        }
    }

    #[test]
    fn rerun_is_deterministic() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0 + i as f64).collect();
        let obs = monthly(FOOD_CPI, &values);
        let t = Thresholds::default();
        assert_eq!(compute_metrics(&obs, &t), compute_metrics(&obs, &t));
    }

    #[test]
    fn raising_a_threshold_never_adds_alerts() {
        let values: Vec<f64> = (0..36).map(|i| 100.0 * 1.004_f64.powi(i) + (i % 5) as f64).collect();
        let obs = monthly(FOOD_CPI, &values);

        let base = compute_metrics(&obs, &Thresholds { yoy: 1.0, mom: 0.1 });
        let stricter = compute_metrics(&obs, &Thresholds { yoy: 4.0, mom: 0.1 });
        assert!(base.alerts().count() > 0);
        for (a, b) in base.rows.iter().zip(&stricter.rows) {
            assert!(a.alert || !b.alert);
            assert_eq!(a.heat, b.heat);
        }
    }
}
