//! Forecaster trait: the seam to the external forecasting collaborator.

use crate::core::{DailySeries, Forecast};
use crate::error::Result;

/// Interface the scoring pipeline requires of a forecasting model.
///
/// The pipeline treats the model as an opaque collaborator: it fits on the
/// training slice and asks for point estimates plus interval bounds for the
/// test horizon. Object-safe, so it can be used as `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the training series.
    fn fit(&mut self, series: &DailySeries) -> Result<()>;

    /// Predict `horizon` future days with intervals at confidence `level`
    /// (e.g. 0.95 means 95% of samples should fall inside the bounds).
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast>;

    /// Model name for reporting.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedForecaster = Box<dyn Forecaster>;
