//! Window average forecasting model: trailing mean of recent observations.

use crate::core::{DailySeries, Forecast};
use crate::error::{AnomalyError, Result};
use crate::models::{quantile_normal, Forecaster};

/// Forecasts the mean of the last `window` observations, with normal
/// intervals from the in-window standard deviation.
#[derive(Debug, Clone)]
pub struct WindowAverage {
    window: usize,
    mean: Option<f64>,
    sigma: Option<f64>,
}

impl WindowAverage {
    /// Create a window-average forecaster. A window of 0 means the full
    /// training history.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            mean: None,
            sigma: None,
        }
    }

    /// Get the configured window size.
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Forecaster for WindowAverage {
    fn fit(&mut self, series: &DailySeries) -> Result<()> {
        let values = series.values();
        if values.is_empty() {
            return Err(AnomalyError::EmptyData);
        }
        if self.window > 0 && values.len() < self.window {
            return Err(AnomalyError::InsufficientData {
                needed: self.window,
                got: values.len(),
            });
        }

        let n = values.len();
        let window = if self.window == 0 { n } else { self.window };
        let recent = &values[n - window..];

        let mean = recent.iter().sum::<f64>() / window as f64;
        let variance = recent.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window as f64;

        self.mean = Some(mean);
        self.sigma = Some(variance.sqrt());

        Ok(())
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let mean = self.mean.ok_or(AnomalyError::FitRequired)?;
        let sigma = self.sigma.ok_or(AnomalyError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::default());
        }

        let z = quantile_normal((1.0 + level) / 2.0);
        let half_width = z * sigma;

        let point = vec![mean; horizon];
        let lower = vec![mean - half_width; horizon];
        let upper = vec![mean + half_width; horizon];

        Forecast::new(point, lower, upper)
    }

    fn name(&self) -> &str {
        "WindowAverage"
    }

    fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn make_series(values: Vec<f64>) -> DailySeries {
        let dates: Vec<NaiveDate> = (0..values.len() as i64)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i))
            .collect();
        DailySeries::new(dates, values).unwrap()
    }

    #[test]
    fn predicts_mean_of_trailing_window() {
        let series = make_series(vec![100.0, 100.0, 1.0, 2.0, 3.0]);
        let mut model = WindowAverage::new(3);
        model.fit(&series).unwrap();

        let forecast = model.predict_with_intervals(2, 0.95).unwrap();
        assert_relative_eq!(forecast.point()[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(forecast.point()[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn zero_window_uses_full_history() {
        let series = make_series(vec![1.0, 2.0, 3.0, 4.0]);
        let mut model = WindowAverage::new(0);
        model.fit(&series).unwrap();

        let forecast = model.predict_with_intervals(1, 0.95).unwrap();
        assert_relative_eq!(forecast.point()[0], 2.5, epsilon = 1e-10);
    }

    #[test]
    fn constant_window_yields_degenerate_interval() {
        let series = make_series(vec![5.0; 10]);
        let mut model = WindowAverage::new(5);
        model.fit(&series).unwrap();

        let forecast = model.predict_with_intervals(1, 0.95).unwrap();
        assert_relative_eq!(forecast.lower()[0], 5.0, epsilon = 1e-10);
        assert_relative_eq!(forecast.upper()[0], 5.0, epsilon = 1e-10);
    }

    #[test]
    fn window_larger_than_history_is_rejected() {
        let series = make_series(vec![1.0, 2.0, 3.0]);
        let mut model = WindowAverage::new(5);

        assert!(matches!(
            model.fit(&series),
            Err(AnomalyError::InsufficientData { needed: 5, got: 3 })
        ));
    }

    #[test]
    fn predict_requires_fit() {
        let model = WindowAverage::new(3);
        assert!(matches!(
            model.predict_with_intervals(2, 0.95),
            Err(AnomalyError::FitRequired)
        ));
    }
}
