//! Encoded price series: prices, their log-returns and the ternary states

use crate::error::{ForecastError, Result};
use series_math::{log_returns, State, StateEncoder};

/// A price series together with its derived returns and states.
///
/// `returns.len() == prices.len() - 1` and `states.len() == returns.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSeries {
    prices: Vec<f64>,
    returns: Vec<f64>,
    states: Vec<State>,
}

impl EncodedSeries {
    /// Compute log-returns of `prices` and encode them with threshold `k`.
    ///
    /// Price validation happens before encoding, so a non-positive price
    /// fails regardless of `k`.
    pub fn encode(prices: &[f64], k: f64) -> Result<Self> {
        let returns = log_returns(prices)?;
        let states = StateEncoder::new(k)?.encode(&returns);

        Ok(Self {
            prices: prices.to_vec(),
            returns,
            states,
        })
    }

    /// Assemble a series from precomputed parts
    pub fn from_parts(prices: Vec<f64>, returns: Vec<f64>, states: Vec<State>) -> Result<Self> {
        if returns.is_empty() || returns.len() + 1 != prices.len() {
            return Err(ForecastError::ValidationError(format!(
                "Expected {} returns for {} prices, got {}",
                prices.len().saturating_sub(1),
                prices.len(),
                returns.len()
            )));
        }

        if states.len() != returns.len() {
            return Err(ForecastError::ValidationError(format!(
                "Returns length ({}) doesn't match states length ({})",
                returns.len(),
                states.len()
            )));
        }

        Ok(Self {
            prices,
            returns,
            states,
        })
    }

    /// Get the prices
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Get the log-returns
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Get the encoded states
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Number of returns (and states)
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Always false for a constructed series
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}
