//! Log-return calculation
//!
//! `return[i] = ln(price[i + 1] / price[i])`, so a series of `n` prices
//! yields `n - 1` returns.

use crate::{MathError, Result};

/// Convert a price series into log-returns.
///
/// Every price must be strictly positive, otherwise the logarithm is undefined
/// and the whole calculation fails.
///
/// # Examples
///
/// ```
/// use series_math::log_returns;
///
/// let returns = log_returns(&[100.0, 110.0, 99.0]).unwrap();
/// assert_eq!(returns.len(), 2);
/// assert!((returns[0] - (1.1f64).ln()).abs() < 1e-12);
/// ```
pub fn log_returns(prices: &[f64]) -> Result<Vec<f64>> {
    if prices.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "At least two prices are required for log-returns, got {}",
            prices.len()
        )));
    }

    if let Some((index, price)) = prices
        .iter()
        .enumerate()
        .find(|&(_, &p)| !(p.is_finite() && p > 0.0))
    {
        return Err(MathError::InvalidInput(format!(
            "Prices must be positive for log-returns, found {} at index {}",
            price, index
        )));
    }

    Ok(prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}
