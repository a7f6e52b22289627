//! Train/test window derivation from a changepoint list.
//!
//! The test window is always the final `test_window` days of the series.
//! Training prefers the whole current regime (from the last interior
//! changepoint to the start of the test window) when it is at least
//! `train_window` days long, and otherwise falls back to a fixed recency
//! window. This avoids training across a detected regime shift while
//! guaranteeing a minimum sample size.

use crate::error::{AnomalyError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Index ranges used for model fitting and evaluation.
///
/// Invariant: `0 <= train_start <= train_end < test_start <= test_end`,
/// with `test_end` the final index of the series. Derived once per scoring
/// run and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub train_start: usize,
    pub train_end: usize,
    pub test_start: usize,
    pub test_end: usize,
}

impl WindowSpec {
    /// Training indices as a half-open range suitable for slicing.
    pub fn train_range(&self) -> Range<usize> {
        self.train_start..self.train_end + 1
    }

    /// Test indices as a half-open range suitable for slicing.
    pub fn test_range(&self) -> Range<usize> {
        self.test_start..self.test_end + 1
    }

    /// Number of training days.
    pub fn train_len(&self) -> usize {
        self.train_end - self.train_start + 1
    }

    /// Number of test days.
    pub fn test_len(&self) -> usize {
        self.test_end - self.test_start + 1
    }
}

/// Derive train/test windows for a series of `series_length` days.
///
/// `changepoints` is the breakpoint list produced by the segmenter: starts
/// at 0, ends at `series_length`. Its second-to-last element is the start of
/// the final regime; for a series with no interior changepoints the list is
/// `[0, series_length]` and training starts from the beginning (subject to
/// the minimum-window rule).
///
/// # Errors
/// `InvalidWindow` if either window is zero, the windows together exceed
/// the series length, or the changepoint list has fewer than 2 elements.
pub fn select_windows(
    series_length: usize,
    changepoints: &[usize],
    train_window: usize,
    test_window: usize,
) -> Result<WindowSpec> {
    if train_window == 0 || test_window == 0 {
        return Err(AnomalyError::InvalidWindow(
            "train and test windows must be at least 1 day".to_string(),
        ));
    }
    if train_window + test_window > series_length {
        return Err(AnomalyError::InvalidWindow(format!(
            "windows ({} train + {} test) exceed series length {}",
            train_window, test_window, series_length
        )));
    }
    if changepoints.len() < 2 {
        return Err(AnomalyError::InvalidWindow(
            "changepoint list must contain at least [0, length]".to_string(),
        ));
    }

    let test_end = series_length - 1;
    let test_start = series_length - test_window;
    let prev_changepoint = changepoints[changepoints.len() - 2];

    // Train on the whole current regime when it is long enough, otherwise
    // fall back to a fixed recency window. Signed arithmetic: a changepoint
    // inside the test window makes the regime length negative, which also
    // takes the fallback.
    let regime_len = test_start as i64 - prev_changepoint as i64;
    let train_start = if regime_len < train_window as i64 {
        test_start - train_window
    } else {
        prev_changepoint
    };
    let train_end = test_start - 1;

    Ok(WindowSpec {
        train_start,
        train_end,
        test_start,
        test_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_regime_falls_back_to_recency_window() {
        // Worked example: len 30, test 7 -> test [23, 29]; regime starts at
        // 10, 13 days < train 14 -> train [9, 22].
        let spec = select_windows(30, &[0, 10, 30], 14, 7).unwrap();

        assert_eq!(spec.test_start, 23);
        assert_eq!(spec.test_end, 29);
        assert_eq!(spec.train_start, 9);
        assert_eq!(spec.train_end, 22);
    }

    #[test]
    fn long_regime_is_used_in_full() {
        // Regime starts at 5; 18 days >= train 14 -> train the whole regime.
        let spec = select_windows(30, &[0, 5, 30], 14, 7).unwrap();

        assert_eq!(spec.train_start, 5);
        assert_eq!(spec.train_end, 22);
        assert_eq!(spec.test_start, 23);
    }

    #[test]
    fn single_regime_trains_from_start() {
        let spec = select_windows(30, &[0, 30], 14, 7).unwrap();

        assert_eq!(spec.train_start, 0);
        assert_eq!(spec.train_end, 22);
    }

    #[test]
    fn changepoint_inside_test_window_falls_back() {
        // Regime "starts" after the test window begins; the regime length is
        // negative and the fixed recency window applies.
        let spec = select_windows(30, &[0, 26, 30], 14, 7).unwrap();

        assert_eq!(spec.train_start, 9);
        assert_eq!(spec.train_end, 22);
    }

    #[test]
    fn window_invariants_hold() {
        let spec = select_windows(60, &[0, 20, 45, 60], 21, 7).unwrap();

        assert!(spec.train_start <= spec.train_end);
        assert!(spec.train_end < spec.test_start);
        assert!(spec.test_start <= spec.test_end);
        assert_eq!(spec.test_end, 59);
        assert_eq!(spec.test_len(), 7);
    }

    #[test]
    fn ranges_cover_the_windows() {
        let spec = select_windows(30, &[0, 30], 14, 7).unwrap();

        assert_eq!(spec.train_range(), 0..23);
        assert_eq!(spec.test_range(), 23..30);
        assert_eq!(spec.train_len(), 23);
    }

    #[test]
    fn zero_windows_are_rejected() {
        assert!(matches!(
            select_windows(30, &[0, 30], 0, 7),
            Err(AnomalyError::InvalidWindow(_))
        ));
        assert!(matches!(
            select_windows(30, &[0, 30], 14, 0),
            Err(AnomalyError::InvalidWindow(_))
        ));
    }

    #[test]
    fn oversized_windows_are_rejected() {
        assert!(matches!(
            select_windows(20, &[0, 20], 14, 7),
            Err(AnomalyError::InvalidWindow(_))
        ));
    }

    #[test]
    fn short_changepoint_list_is_rejected() {
        assert!(matches!(
            select_windows(30, &[0], 14, 7),
            Err(AnomalyError::InvalidWindow(_))
        ));
        assert!(matches!(
            select_windows(30, &[], 14, 7),
            Err(AnomalyError::InvalidWindow(_))
        ));
    }

    #[test]
    fn exact_fit_uses_whole_series() {
        // train + test exactly fill the series
        let spec = select_windows(21, &[0, 21], 14, 7).unwrap();

        assert_eq!(spec.train_start, 0);
        assert_eq!(spec.train_end, 13);
        assert_eq!(spec.test_start, 14);
        assert_eq!(spec.test_end, 20);
    }
}
