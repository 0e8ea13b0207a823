//! Error types for the pattern_forecast crate

use thiserror::Error;

/// Custom error types for the pattern_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to input data loading or shape
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to sequence validation (lengths, split boundaries)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the numeric layer (returns, encoding, metrics)
    #[error("Math error: {0}")]
    MathError(#[from] series_math::MathError),

    /// No candidate memory depth could be evaluated
    #[error("Grid search exhausted: {0}")]
    SearchExhausted(String),

    /// Computation was cancelled by the caller
    #[error("Computation cancelled")]
    Cancelled,

    /// Error from configuration parsing
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
