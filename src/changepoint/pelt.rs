//! PELT (Pruned Exact Linear Time) segmentation.
//!
//! Exact optimal partitioning with a scalar penalty per added segment and
//! candidate pruning, O(n) on average.

use super::cost::{CostFunction, PrefixStats};
use crate::error::{AnomalyError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the segmenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Cost function to use.
    pub cost_fn: CostFunction,
    /// Penalty per added segment; higher values yield fewer changepoints.
    pub penalty: f64,
    /// Minimum segment length.
    pub min_segment_length: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            cost_fn: CostFunction::L2,
            penalty: 10.0,
            min_segment_length: 2,
        }
    }
}

impl SegmentConfig {
    /// Set the cost function.
    pub fn cost_function(mut self, cost_fn: CostFunction) -> Self {
        self.cost_fn = cost_fn;
        self
    }

    /// Set the penalty.
    pub fn penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Set the minimum segment length (at least 1).
    pub fn min_segment_length(mut self, min_len: usize) -> Self {
        self.min_segment_length = min_len.max(1);
        self
    }
}

/// Segment a signal into internally-homogeneous regimes.
///
/// Returns the full breakpoint list delimiting the regimes: it always
/// starts at 0, is strictly increasing, and ends at `signal.len()`.
///
/// # Errors
/// `InsufficientData` if the signal has fewer than 2 points;
/// `InvalidParameter` if the penalty is not a positive finite number.
pub fn segment(signal: &[f64], config: &SegmentConfig) -> Result<Vec<usize>> {
    if signal.len() < 2 {
        return Err(AnomalyError::InsufficientData {
            needed: 2,
            got: signal.len(),
        });
    }
    if !(config.penalty > 0.0) || !config.penalty.is_finite() {
        return Err(AnomalyError::InvalidParameter(
            "changepoint penalty must be positive".to_string(),
        ));
    }

    let n = signal.len();
    let min_len = config.min_segment_length.max(1);

    // Too short to split: the whole series is one regime.
    if n < 2 * min_len {
        return Ok(vec![0, n]);
    }

    let stats = PrefixStats::new(signal);

    // best[t]: minimal penalized cost of segmenting signal[0..t].
    // Seeded with -penalty so the first segment is not charged.
    let mut best = vec![f64::INFINITY; n + 1];
    best[0] = -config.penalty;

    // last_split[t]: start of the final segment in the optimal split of [0..t].
    let mut last_split = vec![0usize; n + 1];

    // Admissible split candidates, pruned as the scan advances.
    let mut candidates: Vec<usize> = vec![0];

    for t in min_len..=n {
        let mut t_best = f64::INFINITY;
        let mut t_split = 0;

        for &s in &candidates {
            if t - s < min_len {
                continue;
            }
            let total = best[s] + stats.cost(s, t, config.cost_fn) + config.penalty;
            if total < t_best {
                t_best = total;
                t_split = s;
            }
        }

        best[t] = t_best;
        last_split[t] = t_split;

        // A candidate whose cost already exceeds best[t] can never win later.
        candidates.retain(|&s| {
            t - s < min_len || best[s] + stats.cost(s, t, config.cost_fn) <= best[t]
        });
        candidates.push(t);
    }

    // Backtrack the optimal split positions.
    let mut breakpoints = vec![n];
    let mut t = n;
    while t > 0 {
        let s = last_split[t];
        breakpoints.push(s);
        t = s;
    }
    breakpoints.reverse();

    Ok(breakpoints)
}
