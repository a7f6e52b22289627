//! Forecast result structure: point estimates with interval bounds.

use crate::error::{AnomalyError, Result};
use serde::{Deserialize, Serialize};

/// A univariate forecast: one point estimate and one `[lower, upper]`
/// interval per horizon step.
///
/// The outlier scorer requires intervals, so unlike a general forecasting
/// result they are mandatory here and all three sequences must have the
/// same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Forecast {
    /// Create a forecast from point estimates and interval bounds.
    pub fn new(point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != point.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: point.len(),
                got: lower.len(),
            });
        }
        if upper.len() != point.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: point.len(),
                got: upper.len(),
            });
        }
        Ok(Self {
            point,
            lower,
            upper,
        })
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if the forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point estimates.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Lower interval bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper interval bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }
}
