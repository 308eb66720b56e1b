//! Synthetic monthly CPI series for offline use and demos.
//!
//! The generator produces a Food CPI and a General CPI series as a seeded random
//! walk in log space, so the same seed always yields the same cache file.

use chrono::{Datelike, Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{FOOD_CPI, GENERAL_CPI, Observation};
use crate::error::AppError;

/// Mean monthly log-change for food prices (~3.6% a year).
const FOOD_DRIFT: f64 = 0.003;
/// Monthly log-change volatility for food prices.
const FOOD_VOL: f64 = 0.004;
/// Seasonal amplitude; food prices peak mid-year.
const FOOD_SEASONAL: f64 = 0.002;
const GENERAL_DRIFT: f64 = 0.0018;
const GENERAL_VOL: f64 = 0.0015;
const BASE_LEVEL: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub area: String,
    pub start: NaiveDate,
    pub months: usize,
    pub seed: u64,
}

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<Observation>, AppError> {
    if config.months == 0 {
        return Err(AppError::input("Sample months must be > 0."));
    }
    let start = config
        .start
        .with_day(1)
        .ok_or_else(|| AppError::input("Invalid sample start date."))?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;

    let mut food = BASE_LEVEL;
    let mut general = BASE_LEVEL;
    let mut out = Vec::with_capacity(config.months * 2);

    for i in 0..config.months {
        let date = u32::try_from(i)
            .ok()
            .and_then(|m| start.checked_add_months(Months::new(m)))
            .ok_or_else(|| AppError::input("Sample range overflows the calendar."))?;

        if i > 0 {
            let phase = (i as f64 / 12.0) * std::f64::consts::TAU;
            let z_food: f64 = normal.sample(&mut rng);
            let z_general: f64 = normal.sample(&mut rng);
            food *= (FOOD_DRIFT + FOOD_SEASONAL * phase.sin() + FOOD_VOL * z_food).exp();
            general *= (GENERAL_DRIFT + GENERAL_VOL * z_general).exp();
        }

        for (indicator, level) in [(FOOD_CPI, food), (GENERAL_CPI, general)] {
            out.push(Observation {
                area: Some(config.area.clone()),
                indicator: indicator.to_string(),
                date,
                value: round_to(level, 2),
            });
        }
    }

    Ok(out)
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> SampleConfig {
        SampleConfig {
            area: "Saudi Arabia".to_string(),
            start: NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
            months: 24,
            seed,
        }
    }

    #[test]
    fn same_seed_same_series() {
        assert_eq!(generate_sample(&config(7)).unwrap(), generate_sample(&config(7)).unwrap());
        assert_ne!(generate_sample(&config(7)).unwrap(), generate_sample(&config(8)).unwrap());
    }

    #[test]
    fn monthly_first_of_month_dates_for_both_indicators() {
        let obs = generate_sample(&config(1)).unwrap();
        assert_eq!(obs.len(), 48);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(obs[47].date, NaiveDate::from_ymd_opt(2022, 12, 1).unwrap());
        assert_eq!(obs.iter().filter(|o| o.indicator == FOOD_CPI).count(), 24);
        assert!(obs.iter().all(|o| o.value > 50.0 && o.value < 200.0));
    }

    #[test]
    fn zero_months_is_rejected() {
        let mut cfg = config(1);
        cfg.months = 0;
        assert!(generate_sample(&cfg).is_err());
    }
}
