//! Export the derived table (CSV) and a run summary (JSON).
//!
//! Both use canonical field names so they are easy to consume in spreadsheets
//! or downstream scripts regardless of the display language.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::{DerivedRow, DerivedTable, HeatMoments, LatestSnapshot, Thresholds};
use crate::error::AppError;

/// JSON summary of one pipeline run.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub tool: &'static str,
    pub source: String,
    pub indicators: &'a [String],
    pub rows: usize,
    pub thresholds: Thresholds,
    pub moments: HeatMoments,
    pub latest: LatestSnapshot,
    pub alerts: Vec<&'a DerivedRow>,
}

impl<'a> RunSummary<'a> {
    pub fn new(table: &'a DerivedTable, latest: LatestSnapshot, source: String) -> Self {
        Self {
            tool: "heat",
            source,
            indicators: &table.indicators,
            rows: table.len(),
            thresholds: table.thresholds,
            moments: table.moments,
            latest,
            alerts: table.alerts().collect(),
        }
    }
}

/// Write every derived row to CSV. Undefined values become empty cells.
pub fn write_table_csv(path: &Path, table: &DerivedTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    for row in &table.rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = table.len(), "exported derived table");
    Ok(())
}

/// Write the run summary as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::runtime(format!("Failed to write summary JSON: {e}")))?;

    info!(path = %path.display(), alerts = summary.alerts.len(), "exported run summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FOOD_CPI, Observation};
    use crate::transform::compute_metrics;
    use chrono::{Months, NaiveDate};

    fn rising_table() -> DerivedTable {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let obs: Vec<Observation> = (0..14)
            .map(|i| Observation {
                area: None,
                indicator: FOOD_CPI.to_string(),
                date: start + Months::new(i),
                value: 100.0 * 1.01_f64.powi(i as i32),
            })
            .collect();
        compute_metrics(&obs, &Thresholds::default())
    }

    #[test]
    fn csv_export_uses_canonical_header_and_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        write_table_csv(&path, &rising_table()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,food_cpi,general_cpi,food_cpi_mom_pct,food_cpi_yoy_pct,\
general_cpi_mom_pct,general_cpi_yoy_pct,heat,alert"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("2023-01-01,100.0,,,,,,,false"));
        assert_eq!(text.lines().count(), 15);
    }

    #[test]
    fn json_summary_lists_alert_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let table = rising_table();
        let latest = table.latest().unwrap();
        write_summary_json(&path, &RunSummary::new(&table, latest, "cache".to_string())).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rows"], 14);
        assert_eq!(value["alerts"].as_array().unwrap().len(), 2);
        assert_eq!(value["alerts"][0]["date"], "2024-01-01");
        assert_eq!(value["latest"]["date"], "2024-02-01");
    }
}
