//! Pivot raw observations into an aligned per-indicator table.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{AlignedTable, Observation};

/// Group observations by date into one column per indicator.
///
/// - rows are sorted by date ascending (one row per distinct date)
/// - every name in `required` exists as a column, all-`None` if never observed
/// - repeated `(indicator, date)` pairs are averaged
pub fn align(observations: &[Observation], required: &[&str]) -> AlignedTable {
    // date -> indicator -> (sum, count)
    let mut cells: BTreeMap<NaiveDate, BTreeMap<&str, (f64, usize)>> = BTreeMap::new();
    let mut indicators: Vec<String> = required.iter().map(|s| s.to_string()).collect();

    for obs in observations {
        if !obs.value.is_finite() {
            continue;
        }
        if !indicators.iter().any(|i| i == &obs.indicator) {
            indicators.push(obs.indicator.clone());
        }
        let slot = cells
            .entry(obs.date)
            .or_default()
            .entry(obs.indicator.as_str())
            .or_insert((0.0, 0));
        slot.0 += obs.value;
        slot.1 += 1;
    }

    let dates: Vec<NaiveDate> = cells.keys().copied().collect();
    let mut columns: BTreeMap<String, Vec<Option<f64>>> = indicators
        .into_iter()
        .map(|name| (name, Vec::with_capacity(dates.len())))
        .collect();

    for (date, row) in &cells {
        for (name, column) in columns.iter_mut() {
            let value = row.get(name.as_str()).map(|&(sum, count)| {
                if count > 1 {
                    warn!(indicator = %name, %date, count, "duplicate observations averaged");
                }
                sum / count as f64
            });
            column.push(value);
        }
    }

    AlignedTable { dates, columns }
}
