//! Core data structures: daily series and forecasts.

pub mod forecast;
pub mod series;

pub use forecast::Forecast;
pub use series::{DailySeries, FillPolicy, SeriesId};
