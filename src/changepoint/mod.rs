//! Changepoint detection: segmenting a series into homogeneous regimes.
//!
//! The segmenter runs PELT (exact optimal partitioning with a per-segment
//! penalty and candidate pruning) and reports the breakpoint indices that
//! delimit the regimes, including 0 and the series length.
//!
//! # Example
//!
//! ```
//! use fleet_anomaly::changepoint::{segment, SegmentConfig};
//!
//! let mut signal = vec![0.0; 50];
//! signal.extend(vec![10.0; 50]);
//!
//! let config = SegmentConfig::default().penalty(5.0);
//! let breakpoints = segment(&signal, &config).unwrap();
//!
//! assert_eq!(breakpoints, vec![0, 50, 100]);
//! ```

pub mod cost;
pub mod pelt;

pub use cost::{l1_cost, l2_cost, normal_cost, segment_cost, CostFunction};
pub use pelt::{segment, SegmentConfig};
