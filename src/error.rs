//! Error types for the anofox-seasonality library.

use thiserror::Error;

/// Result type alias for seasonality and decomposition operations.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that can occur while testing or decomposing a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid argument value (period, model, alpha, lag, bins...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// A univariate series was required.
    #[error("series must be univariate, got {dimensions} components")]
    NotUnivariate { dimensions: usize },

    /// A deterministic series was required.
    #[error("series must be deterministic, got {samples} samples")]
    NotDeterministic { samples: usize },

    /// Two series were expected to share the same time index.
    #[error("series have different time indices")]
    TimeIndexMismatch,

    /// Frequency inference failed.
    #[error("could not infer frequency: {0}")]
    FrequencyInference(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}
