//! Error types for the ssa-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during training, forecasting and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The decomposition produced no usable signal subspace.
    #[error("degenerate subspace: {0}")]
    DegenerateSubspace(String),

    /// The recurrence derivation is numerically unstable.
    #[error("verticality condition violated: denominator {denominator} too close to zero")]
    Verticality { denominator: f64 },

    /// Forecasting attempted without a valid trained model.
    #[error("model must be trained before forecasting")]
    ModelNotTrained,

    /// No overlap between forecast and actual values.
    #[error("empty evaluation set: no aligned forecast/actual pairs")]
    EmptyEvaluationSet,

    /// Checkpoint payload failed structural validation.
    #[error("corrupt checkpoint: {0}")]
    CorruptCheckpoint(String),

    /// I/O failure while reading or writing a checkpoint.
    #[error("checkpoint i/o error: {0}")]
    CheckpointIo(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// A NaN or infinite value was found in input data.
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::InsufficientData { needed: 31, got: 7 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 31, got 7"
        );

        let err = ForecastError::ModelNotTrained;
        assert_eq!(err.to_string(), "model must be trained before forecasting");

        let err = ForecastError::InvalidParameter("rank must be positive".to_string());
        assert_eq!(err.to_string(), "invalid parameter: rank must be positive");

        let err = ForecastError::NonFiniteValue { index: 3 };
        assert_eq!(err.to_string(), "non-finite value at index 3");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::EmptyEvaluationSet;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
