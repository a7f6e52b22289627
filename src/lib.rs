//! # fleet-anomaly
//!
//! Changepoint-aware anomaly scoring for per-customer daily telemetry
//! series (driver counts, speeding events, highway observations).
//!
//! Each series is segmented into regimes with PELT changepoint detection,
//! a train/test window is derived from the final regime, an injected
//! forecasting model produces point estimates with interval bounds for the
//! test window, and days outside a tolerance-widened interval are flagged
//! and assigned a penalty. The sum of penalties is the series' net penalty
//! for the run.
//!
//! ```
//! use fleet_anomaly::models::baseline::Naive;
//! use fleet_anomaly::pipeline::{detect, DetectorConfig};
//! use fleet_anomaly::core::DailySeries;
//! use chrono::{Duration, NaiveDate};
//!
//! let dates: Vec<NaiveDate> = (0..30)
//!     .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i))
//!     .collect();
//! let mut values = vec![10.0; 30];
//! values[27] = 100.0; // anomalous day in the test window
//! let series = DailySeries::new(dates, values).unwrap();
//!
//! let mut model = Naive::new();
//! let report = detect(&series, &mut model, &DetectorConfig::default()).unwrap();
//!
//! assert_eq!(report.outliers.len(), 1);
//! assert!(report.net_penalty > 0.0);
//! ```

pub mod changepoint;
pub mod core;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod window;

pub use error::{AnomalyError, Result};

pub mod prelude {
    pub use crate::changepoint::{segment, CostFunction, SegmentConfig};
    pub use crate::core::{DailySeries, FillPolicy, Forecast, SeriesId};
    pub use crate::detection::{score_outliers, Outlier, ScoreResult};
    pub use crate::error::{AnomalyError, Result};
    pub use crate::models::{BoxedForecaster, Forecaster};
    pub use crate::pipeline::{detect, run_batch, AnomalyReport, DetectorConfig};
    pub use crate::window::{select_windows, WindowSpec};
}
