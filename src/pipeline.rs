//! Anomaly-scoring pipeline: segment, select windows, forecast, score.
//!
//! Each stage consumes the previous stage's immutable result; there is no
//! shared mutable accumulator. One call scores one series to completion, so
//! batches can be parallelized trivially by an external orchestrator.
//! Collaborators (the series source and the report sink) are injected
//! explicitly rather than constructed globally.

use crate::changepoint::{segment, CostFunction, SegmentConfig};
use crate::core::{DailySeries, Forecast, SeriesId};
use crate::detection::{score_outliers, Outlier};
use crate::error::Result;
use crate::models::{BoxedForecaster, Forecaster};
use crate::window::{select_windows, WindowSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration for one scoring run.
///
/// Defaults match the production batch job: a week of test days, two weeks
/// of minimum training, a 10% tolerance band, and a conservative
/// segmentation penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum number of training days leading up to the test window.
    pub train_window: usize,
    /// Number of trailing days to score.
    pub test_window: usize,
    /// Tolerance-band widening factor for the outlier scorer.
    pub beta: f64,
    /// Per-segment penalty for changepoint detection.
    pub changepoint_penalty: f64,
    /// Confidence level for forecast intervals.
    pub interval_width: f64,
    /// Segment cost function.
    pub cost_fn: CostFunction,
    /// Minimum changepoint segment length.
    pub min_segment_length: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            train_window: 14,
            test_window: 7,
            beta: 0.1,
            changepoint_penalty: 10.0,
            interval_width: 0.95,
            cost_fn: CostFunction::L2,
            min_segment_length: 2,
        }
    }
}

impl DetectorConfig {
    fn segment_config(&self) -> SegmentConfig {
        SegmentConfig::default()
            .cost_function(self.cost_fn)
            .penalty(self.changepoint_penalty)
            .min_segment_length(self.min_segment_length)
    }
}

/// Result of scoring one series: everything a sink needs to render and
/// publish the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Identity of the scored series, if it carried one.
    pub id: Option<SeriesId>,
    /// Name of the forecasting model used.
    pub model: String,
    /// Regime breakpoints, including 0 and the series length.
    pub changepoints: Vec<usize>,
    /// Train/test windows used for this run.
    pub windows: WindowSpec,
    /// Forecast for the test window.
    pub forecast: Forecast,
    /// Flagged days in chronological order.
    pub outliers: Vec<Outlier>,
    /// Sum of all outlier penalties; 0.0 when nothing was flagged.
    pub net_penalty: f64,
}

/// Score one series with an injected forecasting model.
///
/// Stages: segment the signal into regimes, derive train/test windows from
/// the final regime, fit the model on the training slice, forecast the test
/// window with intervals, and score the actuals against the tolerance band.
pub fn detect(
    series: &DailySeries,
    model: &mut dyn Forecaster,
    config: &DetectorConfig,
) -> Result<AnomalyReport> {
    let changepoints = segment(series.values(), &config.segment_config())?;
    let windows = select_windows(
        series.len(),
        &changepoints,
        config.train_window,
        config.test_window,
    )?;

    debug!(
        train_start = windows.train_start,
        train_end = windows.train_end,
        test_start = windows.test_start,
        test_end = windows.test_end,
        n_changepoints = changepoints.len().saturating_sub(2),
        "selected scoring windows"
    );

    let train = series.slice(windows.train_start, windows.train_end + 1)?;
    model.fit(&train)?;
    let forecast = model.predict_with_intervals(windows.test_len(), config.interval_width)?;

    let test_dates = &series.dates()[windows.test_range()];
    let test_actuals = &series.values()[windows.test_range()];
    let score = score_outliers(test_dates, test_actuals, &forecast, config.beta)?;

    info!(
        customer = series.id().map(|id| id.customer.as_str()).unwrap_or(""),
        metric = series.id().map(|id| id.metric.as_str()).unwrap_or(""),
        outliers = score.outliers.len(),
        net_penalty = score.net_penalty,
        "scored series"
    );

    Ok(AnomalyReport {
        id: series.id().cloned(),
        model: model.name().to_string(),
        changepoints,
        windows,
        forecast,
        outliers: score.outliers,
        net_penalty: score.net_penalty,
    })
}

/// Supplies series to score, one batch per call.
///
/// Implementations own their extraction concern (warehouse queries, files,
/// fixtures); the pipeline only sees reindexed daily series.
pub trait SeriesSource {
    fn fetch(&mut self) -> Result<Vec<DailySeries>>;
}

/// Consumes finished reports, typically to render and publish them.
pub trait ReportSink {
    fn publish(&mut self, report: &AnomalyReport) -> Result<()>;
}

/// Score every series from `source` independently.
///
/// A series that fails to score is logged and skipped without affecting the
/// rest of the batch. Reports are returned sorted ascending by net penalty;
/// only those with a positive net penalty are forwarded to the sink.
pub fn run_batch<F>(
    source: &mut dyn SeriesSource,
    sink: &mut dyn ReportSink,
    mut make_model: F,
    config: &DetectorConfig,
) -> Result<Vec<AnomalyReport>>
where
    F: FnMut() -> BoxedForecaster,
{
    let batch = source.fetch()?;
    let mut reports = Vec::with_capacity(batch.len());

    for series in &batch {
        let mut model = make_model();
        match detect(series, model.as_mut(), config) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!(
                    customer = series.id().map(|id| id.customer.as_str()).unwrap_or(""),
                    metric = series.id().map(|id| id.metric.as_str()).unwrap_or(""),
                    error = %err,
                    "skipping series"
                );
            }
        }
    }

    reports.sort_by(|a, b| {
        a.net_penalty
            .partial_cmp(&b.net_penalty)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for report in &reports {
        if report.net_penalty > 0.0 {
            if let Err(err) = sink.publish(report) {
                warn!(error = %err, "failed to publish report");
            }
        }
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SeriesId;
    use crate::error::AnomalyError;
    use crate::models::baseline::Naive;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn make_series(values: Vec<f64>) -> DailySeries {
        let dates: Vec<NaiveDate> = (0..values.len() as i64)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i))
            .collect();
        DailySeries::new(dates, values).unwrap()
    }

    struct VecSource(Vec<DailySeries>);

    impl SeriesSource for VecSource {
        fn fetch(&mut self) -> Result<Vec<DailySeries>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct CollectingSink(Vec<AnomalyReport>);

    impl ReportSink for CollectingSink {
        fn publish(&mut self, report: &AnomalyReport) -> Result<()> {
            self.0.push(report.clone());
            Ok(())
        }
    }

    #[test]
    fn detect_flags_a_spike_in_the_test_window() {
        // Flat series with one extreme day near the end.
        let mut values = vec![10.0; 30];
        values[27] = 100.0;
        let series = make_series(values);

        let mut model = Naive::new();
        let report = detect(&series, &mut model, &DetectorConfig::default()).unwrap();

        assert_eq!(report.outliers.len(), 1);
        assert_relative_eq!(report.outliers[0].actual, 100.0, epsilon = 1e-10);
        // Naive forecast is 10.0, penalty = (100 - 10) / 10
        assert_relative_eq!(report.net_penalty, 9.0, epsilon = 1e-6);
        assert_eq!(report.model, "Naive");
    }

    #[test]
    fn detect_reports_zero_penalty_for_clean_series() {
        let series = make_series(vec![10.0; 30]);

        let mut model = Naive::new();
        let report = detect(&series, &mut model, &DetectorConfig::default()).unwrap();

        assert!(report.outliers.is_empty());
        assert_eq!(report.net_penalty, 0.0);
        assert_eq!(report.changepoints, vec![0, 30]);
    }

    #[test]
    fn detect_windows_respect_regime_boundaries() {
        // Level shift at day 10 of 40; regime [10, 33) is 23 days, longer
        // than the 14-day minimum, so training starts at the shift.
        let mut values = vec![0.0; 10];
        values.extend(vec![50.0; 30]);
        let series = make_series(values);

        let mut model = Naive::new();
        let report = detect(&series, &mut model, &DetectorConfig::default()).unwrap();

        assert!(report.changepoints.contains(&10));
        assert_eq!(report.windows.train_start, 10);
        assert_eq!(report.windows.test_start, 33);
    }

    #[test]
    fn detect_rejects_series_shorter_than_the_windows() {
        let series = make_series(vec![1.0; 10]);

        let mut model = Naive::new();
        let result = detect(&series, &mut model, &DetectorConfig::default());

        assert!(matches!(result, Err(AnomalyError::InvalidWindow(_))));
    }

    #[test]
    fn run_batch_isolates_failing_series() {
        let good = {
            let mut values = vec![10.0; 30];
            values[28] = 60.0;
            make_series(values).with_id(SeriesId::new("acme", "speeding"))
        };
        let too_short = make_series(vec![1.0; 5]).with_id(SeriesId::new("tiny", "speeding"));

        let mut source = VecSource(vec![too_short, good]);
        let mut sink = CollectingSink::default();

        let reports = run_batch(
            &mut source,
            &mut sink,
            || Box::new(Naive::new()),
            &DetectorConfig::default(),
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id.as_ref().unwrap().customer, "acme");
    }

    #[test]
    fn run_batch_publishes_only_positive_penalties_sorted() {
        let clean = make_series(vec![10.0; 30]).with_id(SeriesId::new("clean", "drivers"));
        let mild = {
            let mut values = vec![10.0; 30];
            values[29] = 25.0;
            make_series(values).with_id(SeriesId::new("mild", "drivers"))
        };
        let severe = {
            let mut values = vec![10.0; 30];
            values[29] = 200.0;
            make_series(values).with_id(SeriesId::new("severe", "drivers"))
        };

        let mut source = VecSource(vec![severe, clean, mild]);
        let mut sink = CollectingSink::default();

        let reports = run_batch(
            &mut source,
            &mut sink,
            || Box::new(Naive::new()),
            &DetectorConfig::default(),
        )
        .unwrap();

        // All three scored, ascending by net penalty.
        assert_eq!(reports.len(), 3);
        assert!(reports.windows(2).all(|w| w[0].net_penalty <= w[1].net_penalty));
        assert_eq!(reports[0].id.as_ref().unwrap().customer, "clean");

        // Only flagged series reach the sink.
        assert_eq!(sink.0.len(), 2);
        assert_eq!(sink.0[0].id.as_ref().unwrap().customer, "mild");
        assert_eq!(sink.0[1].id.as_ref().unwrap().customer, "severe");
    }

    #[test]
    fn default_config_matches_batch_job_settings() {
        let config = DetectorConfig::default();
        assert_eq!(config.train_window, 14);
        assert_eq!(config.test_window, 7);
        assert_relative_eq!(config.beta, 0.1, epsilon = 1e-10);
        assert_relative_eq!(config.changepoint_penalty, 10.0, epsilon = 1e-10);
        assert_relative_eq!(config.interval_width, 0.95, epsilon = 1e-10);
    }
}
