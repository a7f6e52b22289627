//! Tolerance-band outlier scoring against a forecast.
//!
//! A test-window day is flagged when its actual value falls outside the
//! forecast interval widened by a tolerance factor `beta`. Each flagged day
//! receives a penalty equal to the relative deviation of the actual value
//! from the forecast point estimate; the net penalty for the run is the sum.

use crate::core::Forecast;
use crate::error::{AnomalyError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A flagged test-window day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    /// Date of the flagged observation.
    pub date: NaiveDate,
    /// Actual observed value.
    pub actual: f64,
    /// Relative deviation magnitude from the forecast point estimate.
    pub penalty: f64,
}

/// Result of scoring one test window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Flagged days in chronological order.
    pub outliers: Vec<Outlier>,
    /// Sum of all penalties; 0.0 when nothing was flagged.
    pub net_penalty: f64,
}

impl ScoreResult {
    /// Number of flagged days.
    pub fn outlier_count(&self) -> usize {
        self.outliers.len()
    }
}

/// Score actual values against a forecast with a tolerance band.
///
/// For each position i the acceptance band is
/// `[(1 - beta) * lower[i], (1 + beta) * upper[i]]`; beta widens the band
/// as a fraction of the interval bounds, making the detector more
/// permissive as it grows. A flagged day whose point estimate is exactly
/// zero receives the absolute deviation as its penalty, since the relative
/// deviation is undefined there.
///
/// # Errors
/// `InvalidParameter` if beta is negative or non-finite;
/// `DimensionMismatch` if dates, actuals, and forecast differ in length.
pub fn score_outliers(
    dates: &[NaiveDate],
    actuals: &[f64],
    forecast: &Forecast,
    beta: f64,
) -> Result<ScoreResult> {
    if !beta.is_finite() || beta < 0.0 {
        return Err(AnomalyError::InvalidParameter(
            "beta must be a non-negative finite number".to_string(),
        ));
    }
    if actuals.len() != forecast.horizon() {
        return Err(AnomalyError::DimensionMismatch {
            expected: forecast.horizon(),
            got: actuals.len(),
        });
    }
    if dates.len() != actuals.len() {
        return Err(AnomalyError::DimensionMismatch {
            expected: actuals.len(),
            got: dates.len(),
        });
    }

    let point = forecast.point();
    let lower = forecast.lower();
    let upper = forecast.upper();

    let mut outliers = Vec::new();
    let mut net_penalty = 0.0;

    for i in 0..actuals.len() {
        let actual = actuals[i];
        let lower_bound = (1.0 - beta) * lower[i];
        let upper_bound = (1.0 + beta) * upper[i];

        let deviation = if actual < lower_bound {
            Some(point[i] - actual)
        } else if actual > upper_bound {
            Some(actual - point[i])
        } else {
            None
        };

        if let Some(deviation) = deviation {
            let penalty = if point[i] == 0.0 {
                (actual - point[i]).abs()
            } else {
                deviation / point[i]
            };
            debug!(
                date = %dates[i],
                actual,
                lower_bound,
                upper_bound,
                penalty,
                "actual value outside prediction interval"
            );
            net_penalty += penalty;
            outliers.push(Outlier {
                date: dates[i],
                actual,
                penalty,
            });
        }
    }

    Ok(ScoreResult {
        outliers,
        net_penalty,
    })
}
