//! Baseline forecasting models with native prediction intervals.

pub mod naive;
pub mod window_average;

pub use naive::Naive;
pub use window_average::WindowAverage;
