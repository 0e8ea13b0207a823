//! # Series Math
//!
//! Numeric building blocks for pattern-based price forecasting.
//! This crate turns a price series into log-returns, quantizes the returns
//! into ternary states and scores forecasts against observed values.

use thiserror::Error;

pub mod encoding;
pub mod metrics;
pub mod returns;

pub use encoding::{encode_states, State, StateEncoder};
pub use metrics::ErrorMetrics;
pub use returns::log_returns;

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Metric is undefined: {0}")]
    Undefined(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
