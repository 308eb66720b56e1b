//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the loader from any CSV source
//! - transformed by the pipeline without touching presentation state
//! - exported to CSV/JSON as-is

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Indicator name of the food price index.
pub const FOOD_CPI: &str = "Food CPI";
/// Indicator name of the headline price index.
pub const GENERAL_CPI: &str = "General CPI";
/// Indicators that always exist as aligned columns and receive derived metrics.
pub const TRACKED_INDICATORS: [&str; 2] = [FOOD_CPI, GENERAL_CPI];

/// One raw observation: a single indicator value for a single month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub area: Option<String>,
    pub indicator: String,
    /// Always the first day of the observed month.
    pub date: NaiveDate,
    pub value: f64,
}

/// Observations pivoted into one column per indicator, one row per date.
///
/// `dates` is strictly increasing and every column has `dates.len()` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedTable {
    pub dates: Vec<NaiveDate>,
    pub columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl AlignedTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, indicator: &str) -> Option<&[Option<f64>]> {
        self.columns.get(indicator).map(Vec::as_slice)
    }

    pub fn indicators(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// Alert thresholds in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub yoy: f64,
    pub mom: f64,
}

impl Thresholds {
    pub const YOY_RANGE: (f64, f64) = (0.0, 10.0);
    pub const MOM_RANGE: (f64, f64) = (0.0, 5.0);
    pub const STEP: f64 = 0.1;

    /// Build thresholds from user input, rejecting values outside the allowed ranges.
    pub fn validated(yoy: f64, mom: f64) -> Result<Self, AppError> {
        if !(yoy.is_finite() && (Self::YOY_RANGE.0..=Self::YOY_RANGE.1).contains(&yoy)) {
            return Err(AppError::input(format!(
                "YoY threshold {yoy} is outside {:.1}..={:.1}%.",
                Self::YOY_RANGE.0,
                Self::YOY_RANGE.1
            )));
        }
        if !(mom.is_finite() && (Self::MOM_RANGE.0..=Self::MOM_RANGE.1).contains(&mom)) {
            return Err(AppError::input(format!(
                "MoM threshold {mom} is outside {:.1}..={:.1}%.",
                Self::MOM_RANGE.0,
                Self::MOM_RANGE.1
            )));
        }
        Ok(Self { yoy, mom })
    }

    /// Move the YoY threshold by `steps` increments of 0.1, staying in range.
    pub fn step_yoy(self, steps: i32) -> Self {
        Self {
            yoy: step_within(self.yoy, steps, Self::YOY_RANGE),
            ..self
        }
    }

    /// Move the MoM threshold by `steps` increments of 0.1, staying in range.
    pub fn step_mom(self, steps: i32) -> Self {
        Self {
            mom: step_within(self.mom, steps, Self::MOM_RANGE),
            ..self
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { yoy: 3.0, mom: 0.6 }
    }
}

fn step_within(value: f64, steps: i32, (lo, hi): (f64, f64)) -> f64 {
    let next = value + f64::from(steps) * Thresholds::STEP;
    // Round to one decimal so repeated steps don't accumulate float drift.
    ((next * 10.0).round() / 10.0).clamp(lo, hi)
}

/// Display language for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }
}

/// Per-session state chosen by the user. Owned by the front-end, passed by reference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Session {
    pub language: Language,
    pub thresholds: Thresholds,
}

/// Where and how the loader obtains observations.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub cache_path: PathBuf,
    /// Remote CSV endpoints tried in order before falling back to the cache.
    pub source_urls: Vec<String>,
    /// Case-insensitive substring matched against the `Area` column, when present.
    pub country: Option<String>,
    pub offline: bool,
    /// Rewrite the cache file after a successful remote fetch.
    pub refresh_cache: bool,
}

/// One row of the derived table: aligned levels plus every computed metric.
///
/// Field names are the canonical (non-localized) output schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub date: NaiveDate,
    pub food_cpi: Option<f64>,
    pub general_cpi: Option<f64>,
    pub food_cpi_mom_pct: Option<f64>,
    pub food_cpi_yoy_pct: Option<f64>,
    pub general_cpi_mom_pct: Option<f64>,
    pub general_cpi_yoy_pct: Option<f64>,
    pub heat: Option<f64>,
    pub alert: bool,
}

/// Mean and sample standard deviation of one derived column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub mean: f64,
    pub std: f64,
    pub n: usize,
}

/// Moments used to standardize the heat score inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeatMoments {
    pub yoy: Option<Moments>,
    pub mom: Option<Moments>,
}

/// Full pipeline output.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub rows: Vec<DerivedRow>,
    /// Every indicator column present after alignment (tracked ones included).
    pub indicators: Vec<String>,
    pub thresholds: Thresholds,
    pub moments: HeatMoments,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows where both thresholds were exceeded.
    pub fn alerts(&self) -> impl Iterator<Item = &DerivedRow> {
        self.rows.iter().filter(|r| r.alert)
    }

    /// Headline values from the most recent row.
    pub fn latest(&self) -> Result<LatestSnapshot, AppError> {
        let row = self.rows.last().ok_or_else(AppError::empty_series)?;
        Ok(LatestSnapshot {
            date: row.date,
            food_cpi: row.food_cpi,
            food_cpi_yoy_pct: row.food_cpi_yoy_pct,
            food_cpi_mom_pct: row.food_cpi_mom_pct,
        })
    }
}

/// KPI values shown as summary indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestSnapshot {
    pub date: NaiveDate,
    pub food_cpi: Option<f64>,
    pub food_cpi_yoy_pct: Option<f64>,
    pub food_cpi_mom_pct: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_steps_stay_in_range_without_drift() {
        let mut t = Thresholds::default();
        for _ in 0..7 {
            t = t.step_mom(1);
        }
        assert_eq!(t.mom, 1.3);

        let t = Thresholds { yoy: 9.95, mom: 0.0 }.step_yoy(3).step_mom(-2);
        assert_eq!(t.yoy, 10.0);
        assert_eq!(t.mom, 0.0);
    }

    #[test]
    fn validated_rejects_out_of_range() {
        assert!(Thresholds::validated(3.0, 0.6).is_ok());
        assert!(Thresholds::validated(10.5, 0.6).is_err());
        assert!(Thresholds::validated(3.0, -0.1).is_err());
        assert!(Thresholds::validated(f64::NAN, 0.6).is_err());
    }

    #[test]
    fn latest_on_empty_table_is_an_error() {
        let table = DerivedTable {
            rows: Vec::new(),
            indicators: Vec::new(),
            thresholds: Thresholds::default(),
            moments: HeatMoments::default(),
        };
        let err = table.latest().unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_EMPTY);
    }

    #[test]
    fn language_toggles_between_two_values() {
        assert_eq!(Language::En.toggle(), Language::Ar);
        assert_eq!(Language::Ar.toggle().code(), "en");
    }
}
