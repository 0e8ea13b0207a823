//! Error metrics for evaluating forecasts against observed values

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Values with a magnitude below this are skipped by MAPE
pub const MAPE_EPSILON: f64 = 1e-12;

fn validate(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(MathError::InsufficientData(
            "Actual and predicted values must not be empty".to_string(),
        ));
    }

    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }

    Ok(())
}

/// Mean Absolute Error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    validate(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Mean Squared Error
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    validate(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Root Mean Squared Error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}

/// Mean Absolute Percentage Error, in percent
///
/// Only indices where `|actual| >= MAPE_EPSILON` contribute. If none do the
/// metric is undefined.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    validate(actual, predicted)?;

    let (sum, count) = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, _)| a.abs() >= MAPE_EPSILON)
        .fold((0.0, 0usize), |(sum, count), (a, p)| {
            (sum + ((a - p) / a.abs()).abs(), count + 1)
        });

    if count == 0 {
        return Err(MathError::Undefined(
            "MAPE cannot be calculated when all actual values are zero".to_string(),
        ));
    }

    Ok(100.0 * sum / count as f64)
}

/// Metric scaled by the mean absolute actual value, in percent.
///
/// Returns `None` for an empty series or a mean below `MAPE_EPSILON`.
pub fn relative_percent(metric: f64, actual: &[f64]) -> Option<f64> {
    if actual.is_empty() {
        return None;
    }

    let mean_abs = actual.iter().map(|a| a.abs()).sum::<f64>() / actual.len() as f64;
    if mean_abs < MAPE_EPSILON {
        return None;
    }

    Some(metric / mean_abs * 100.0)
}

/// Squared metric (MSE) scaled by the mean squared actual value, in percent.
pub fn relative_squared_percent(metric: f64, actual: &[f64]) -> Option<f64> {
    if actual.is_empty() {
        return None;
    }

    let mean_square = actual.iter().map(|a| a * a).sum::<f64>() / actual.len() as f64;
    if mean_square < MAPE_EPSILON {
        return None;
    }

    Some(metric / mean_square * 100.0)
}

/// Error metrics for a forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, in percent
    pub mape_percent: f64,
}

impl ErrorMetrics {
    /// Compute all four metrics, failing if any of them fails
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        let mse = mean_squared_error(actual, predicted)?;

        Ok(Self {
            mae: mean_absolute_error(actual, predicted)?,
            mse,
            rmse: mse.sqrt(),
            mape_percent: mean_absolute_percentage_error(actual, predicted)?,
        })
    }
}

impl std::fmt::Display for ErrorMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Error Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape_percent)?;
        Ok(())
    }
}
