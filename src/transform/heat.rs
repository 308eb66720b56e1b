//! Composite "heat" score: weighted z-scores of Food CPI YoY% and MoM%.

use crate::domain::{HeatMoments, Moments};
use crate::math::{defined_values, mean, sample_std};

pub const YOY_WEIGHT: f64 = 0.6;
pub const MOM_WEIGHT: f64 = 0.4;
/// Added to the standard deviation so constant series don't divide by zero.
pub const EPSILON: f64 = 1e-6;

impl Moments {
    /// Mean and sample std over the defined values of a column.
    ///
    /// A single defined value has no spread; its std is taken as 0 and the
    /// `EPSILON` guard applies like for any constant series.
    pub fn from_column(column: &[Option<f64>]) -> Option<Self> {
        let values = defined_values(column);
        let mean = mean(&values)?;
        let std = sample_std(&values).unwrap_or(0.0);
        Some(Self {
            mean,
            std,
            n: values.len(),
        })
    }

    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / (self.std + EPSILON)
    }
}

/// Heat per row, plus the moments used to standardize.
///
/// A row gets a score only when both its YoY% and MoM% are defined.
pub fn heat_scores(yoy: &[Option<f64>], mom: &[Option<f64>]) -> (Vec<Option<f64>>, HeatMoments) {
    let moments = HeatMoments {
        yoy: Moments::from_column(yoy),
        mom: Moments::from_column(mom),
    };

    let scores = yoy
        .iter()
        .zip(mom)
        .map(|(&y, &m)| {
            let (y, m) = (y?, m?);
            let (my, mm) = (moments.yoy?, moments.mom?);
            let heat = YOY_WEIGHT * my.z_score(y) + MOM_WEIGHT * mm.z_score(m);
            heat.is_finite().then_some(heat)
        })
        .collect();

    (scores, moments)
}
