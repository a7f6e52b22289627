//! Segment cost functions for changepoint detection.
//!
//! A cost function measures how poorly a single homogeneous model fits a
//! data segment; the segmenter minimizes total cost plus a per-segment
//! penalty.

use serde::{Deserialize, Serialize};

/// Cost function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CostFunction {
    /// Sum of absolute deviations from the segment median. Robust to outliers.
    L1,
    /// Sum of squared deviations from the segment mean.
    #[default]
    L2,
    /// Gaussian negative log-likelihood, n * log(variance). Sensitive to
    /// variance changes as well as mean shifts.
    Normal,
}

/// Compute the cost of a segment using the specified cost function.
pub fn segment_cost(segment: &[f64], cost_fn: CostFunction) -> f64 {
    match cost_fn {
        CostFunction::L1 => l1_cost(segment),
        CostFunction::L2 => l2_cost(segment),
        CostFunction::Normal => normal_cost(segment),
    }
}

/// L1 cost: sum of absolute deviations from the median.
pub fn l1_cost(segment: &[f64]) -> f64 {
    if segment.is_empty() {
        return 0.0;
    }
    let median = median(segment);
    segment.iter().map(|x| (x - median).abs()).sum()
}

/// L2 cost: sum of squared deviations from the mean (residual sum of squares).
pub fn l2_cost(segment: &[f64]) -> f64 {
    if segment.is_empty() {
        return 0.0;
    }
    let mean = segment.iter().sum::<f64>() / segment.len() as f64;
    segment.iter().map(|x| (x - mean).powi(2)).sum()
}

/// Normal cost: n * log(variance), ignoring constant terms.
pub fn normal_cost(segment: &[f64]) -> f64 {
    let n = segment.len();
    if n < 2 {
        return 0.0;
    }
    let variance = l2_cost(segment) / n as f64;
    if variance < 1e-10 {
        return 0.0; // constant segment
    }
    n as f64 * variance.ln()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Prefix sums over a signal for O(1) L2/Normal segment costs.
///
/// L1 has no prefix-sum shortcut; its cost is computed directly from the
/// slice.
#[derive(Debug, Clone)]
pub(crate) struct PrefixStats<'a> {
    signal: &'a [f64],
    cum_sum: Vec<f64>,
    cum_sum_sq: Vec<f64>,
}

impl<'a> PrefixStats<'a> {
    pub(crate) fn new(signal: &'a [f64]) -> Self {
        let mut cum_sum = Vec::with_capacity(signal.len() + 1);
        let mut cum_sum_sq = Vec::with_capacity(signal.len() + 1);
        cum_sum.push(0.0);
        cum_sum_sq.push(0.0);
        let (mut s, mut sq) = (0.0, 0.0);
        for &x in signal {
            s += x;
            sq += x * x;
            cum_sum.push(s);
            cum_sum_sq.push(sq);
        }
        Self {
            signal,
            cum_sum,
            cum_sum_sq,
        }
    }

    /// Cost of `signal[start..end]` under `cost_fn`.
    pub(crate) fn cost(&self, start: usize, end: usize, cost_fn: CostFunction) -> f64 {
        let n = end - start;
        if n == 0 {
            return 0.0;
        }
        match cost_fn {
            CostFunction::L1 => l1_cost(&self.signal[start..end]),
            CostFunction::L2 | CostFunction::Normal => {
                let sum = self.cum_sum[end] - self.cum_sum[start];
                let sum_sq = self.cum_sum_sq[end] - self.cum_sum_sq[start];
                let mean = sum / n as f64;
                let rss = (sum_sq - n as f64 * mean * mean).max(0.0);
                if cost_fn == CostFunction::Normal {
                    if n < 2 {
                        return 0.0;
                    }
                    let variance = rss / n as f64;
                    if variance < 1e-10 {
                        0.0
                    } else {
                        n as f64 * variance.ln()
                    }
                } else {
                    rss
                }
            }
        }
    }
}
