//! Outlier detection against forecast intervals.

pub mod outlier;

pub use outlier::{score_outliers, Outlier, ScoreResult};
