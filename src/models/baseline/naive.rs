//! Naive forecasting model: repeats the last observed value.

use crate::core::{DailySeries, Forecast};
use crate::error::{AnomalyError, Result};
use crate::models::{quantile_normal, Forecaster};

/// Naive forecaster with normal prediction intervals.
///
/// Point estimates repeat the last value; the interval half-width grows
/// with sqrt(horizon) scaled by the standard deviation of the first
/// differences.
#[derive(Debug, Clone, Default)]
pub struct Naive {
    last_value: Option<f64>,
    residual_sigma: Option<f64>,
}

impl Naive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for Naive {
    fn fit(&mut self, series: &DailySeries) -> Result<()> {
        let values = series.values();
        if values.is_empty() {
            return Err(AnomalyError::EmptyData);
        }

        self.last_value = Some(values[values.len() - 1]);

        // Residuals of the naive one-step forecast are first differences.
        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let sigma = if diffs.is_empty() {
            0.0
        } else {
            (diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64).sqrt()
        };
        self.residual_sigma = Some(sigma);

        Ok(())
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let last = self.last_value.ok_or(AnomalyError::FitRequired)?;
        let sigma = self.residual_sigma.ok_or(AnomalyError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::default());
        }

        let z = quantile_normal((1.0 + level) / 2.0);

        let mut point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for h in 1..=horizon {
            let se = sigma * (h as f64).sqrt();
            point.push(last);
            lower.push(last - z * se);
            upper.push(last + z * se);
        }

        Forecast::new(point, lower, upper)
    }

    fn name(&self) -> &str {
        "Naive"
    }

    fn is_fitted(&self) -> bool {
        self.last_value.is_some()
    }
}
