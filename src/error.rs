//! Error types for the fleet-anomaly library.

use thiserror::Error;

/// Result type alias for anomaly-scoring operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;

/// Errors that can occur while scoring a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnomalyError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Train/test window derivation failed.
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Date-grid validation error.
    #[error("date error: {0}")]
    DateError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = AnomalyError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = AnomalyError::InsufficientData { needed: 2, got: 1 };
        assert_eq!(err.to_string(), "insufficient data: need at least 2, got 1");

        let err = AnomalyError::InvalidParameter("penalty must be positive".to_string());
        assert_eq!(err.to_string(), "invalid parameter: penalty must be positive");

        let err = AnomalyError::InvalidWindow("test window exceeds series length".to_string());
        assert_eq!(
            err.to_string(),
            "invalid window: test window exceeds series length"
        );

        let err = AnomalyError::FitRequired;
        assert_eq!(err.to_string(), "model must be fitted before prediction");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = AnomalyError::EmptyData;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
