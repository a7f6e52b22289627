//! DailySeries data structure for per-customer daily telemetry.

use crate::error::{AnomalyError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identity of a series: which customer and which metric it tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesId {
    /// Customer the series belongs to.
    pub customer: String,
    /// Metric name, e.g. "driver count" or "speeding".
    pub metric: String,
}

impl SeriesId {
    pub fn new(customer: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            metric: metric.into(),
        }
    }
}

/// Policy for filling gaps when reindexing sparse observations to a daily grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Linear interpolation between the surrounding observed values.
    #[default]
    Interpolate,
    /// Fill missing days with zero (for count metrics where absence means none).
    Zero,
}

/// A daily time series: one value per calendar day, no gaps.
///
/// Index position is the sole addressing scheme used downstream; dates are
/// carried for reporting only. The original observed values are kept
/// alongside the filled ones, with NaN marking imputed days, so consumers
/// can distinguish real from reconstructed points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySeries {
    id: Option<SeriesId>,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    observed: Vec<f64>,
}

impl DailySeries {
    /// Create a series from an already-complete daily grid.
    ///
    /// Fails if dates and values differ in length, or if the dates are not
    /// strictly increasing consecutive calendar days.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] - pair[0] != Duration::days(1) {
                return Err(AnomalyError::DateError(format!(
                    "dates must be consecutive calendar days, found {} after {}",
                    pair[1], pair[0]
                )));
            }
        }
        let observed = values.clone();
        Ok(Self {
            id: None,
            dates,
            values,
            observed,
        })
    }

    /// Reindex sparse (date, value) observations to the full daily grid
    /// between the first and last observation, filling gaps per `fill`.
    ///
    /// Observations must be strictly increasing by date. Interpolation only
    /// applies when more than two observations exist; shorter inputs are
    /// zero-filled regardless of policy.
    pub fn from_observations(rows: &[(NaiveDate, f64)], fill: FillPolicy) -> Result<Self> {
        if rows.is_empty() {
            return Err(AnomalyError::EmptyData);
        }
        for pair in rows.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(AnomalyError::DateError(format!(
                    "observations must be strictly increasing by date, found {} after {}",
                    pair[1].0, pair[0].0
                )));
            }
        }

        let start = rows[0].0;
        let end = rows[rows.len() - 1].0;
        let n = (end - start).num_days() as usize + 1;

        let mut dates = Vec::with_capacity(n);
        let mut observed = vec![f64::NAN; n];
        for i in 0..n {
            dates.push(start + Duration::days(i as i64));
        }
        for &(date, value) in rows {
            let idx = (date - start).num_days() as usize;
            observed[idx] = value;
        }

        let values = match fill {
            FillPolicy::Interpolate if rows.len() > 2 => interpolate_gaps(&observed),
            _ => observed
                .iter()
                .map(|&v| if v.is_nan() { 0.0 } else { v })
                .collect(),
        };

        Ok(Self {
            id: None,
            dates,
            values,
            observed,
        })
    }

    /// Attach a series identity.
    pub fn with_id(mut self, id: SeriesId) -> Self {
        self.id = Some(id);
        self
    }

    /// Get the series identity, if any.
    pub fn id(&self) -> Option<&SeriesId> {
        self.id.as_ref()
    }

    /// Number of days in the series.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Get the daily date grid.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the (gap-filled) values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the raw observed values; NaN marks an imputed day.
    pub fn observed(&self) -> &[f64] {
        &self.observed
    }

    /// Extract a sub-series by index range (end exclusive).
    pub fn slice(&self, start: usize, end: usize) -> Result<DailySeries> {
        if start > end {
            return Err(AnomalyError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(AnomalyError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }
        Ok(DailySeries {
            id: self.id.clone(),
            dates: self.dates[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            observed: self.observed[start..end].to_vec(),
        })
    }
}

/// Linear interpolation across interior NaN runs.
///
/// The grid spans the first to the last observation, so every NaN run has
/// valid values on both sides.
fn interpolate_gaps(values: &[f64]) -> Vec<f64> {
    let mut result = values.to_vec();
    let n = result.len();

    let mut i = 0;
    while i < n {
        if result[i].is_nan() {
            let gap_start = i;
            while i < n && result[i].is_nan() {
                i += 1;
            }
            let gap_end = i;

            let left = result[gap_start - 1];
            let right = result[gap_end];
            let segments = (gap_end - gap_start + 1) as f64;
            for (j, idx) in (gap_start..gap_end).enumerate() {
                let t = (j + 1) as f64 / segments;
                result[idx] = left + t * (right - left);
            }
        } else {
            i += 1;
        }
    }

    result
}
