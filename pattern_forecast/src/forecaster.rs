//! Walk-forward one-step-ahead forecasting over the evaluation range

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, RuleTrainer, TrainedForecastModel};
use crate::series::EncodedSeries;
use serde::{Deserialize, Serialize};
use series_math::ErrorMetrics;

/// Result of evaluating one trained model over the evaluation range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Memory depth of the model
    pub memory: usize,
    /// Number of returns used for training
    pub train_returns_count: usize,
    /// Observed returns over the evaluation range
    pub actual_returns: Vec<f64>,
    /// Mean return of each predicted state
    pub predicted_returns: Vec<f64>,
    /// Observed prices one step ahead of each evaluation index
    pub actual_prices: Vec<f64>,
    /// Compounded predicted prices
    pub predicted_prices: Vec<f64>,
    /// Error metrics of predicted against actual prices
    pub metrics: ErrorMetrics,
}

impl ForecastResult {
    /// Number of forecast steps
    pub fn len(&self) -> usize {
        self.predicted_prices.len()
    }

    /// True when no step was forecast
    pub fn is_empty(&self) -> bool {
        self.predicted_prices.is_empty()
    }

    /// Serialize the result as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Walk-forward forecaster
#[derive(Debug, Clone, Copy, Default)]
pub struct Forecaster;

impl Forecaster {
    /// Create a new forecaster
    pub fn new() -> Self {
        Self
    }

    /// Forecast every step after the first `train_returns_count` returns.
    ///
    /// At each step `t` the window of states `[t - m, t)` selects the most
    /// likely next state, whose mean return is compounded onto the previous
    /// predicted price. The chain starts from the observed price at the
    /// training boundary and never re-anchors to observed prices.
    pub fn walk_forward<M: TrainedForecastModel>(
        &self,
        series: &EncodedSeries,
        model: &M,
        train_returns_count: usize,
    ) -> Result<ForecastResult> {
        let memory = model.memory();
        let n = series.len();

        if train_returns_count <= memory || train_returns_count >= n {
            return Err(ForecastError::ValidationError(format!(
                "Training size ({}) must be greater than memory ({}) and less than the number of returns ({})",
                train_returns_count, memory, n
            )));
        }

        let prices = series.prices();
        let returns = series.returns();
        let states = series.states();

        let steps = n - train_returns_count;
        let mut actual_returns = Vec::with_capacity(steps);
        let mut predicted_returns = Vec::with_capacity(steps);
        let mut actual_prices = Vec::with_capacity(steps);
        let mut predicted_prices = Vec::with_capacity(steps);

        let mut current_price = prices[train_returns_count];

        for t in train_returns_count..n {
            let predicted_state = model.predict_state(&states[t - memory..t]);
            let predicted_return = model.predicted_return(predicted_state);

            current_price *= predicted_return.exp();

            actual_returns.push(returns[t]);
            predicted_returns.push(predicted_return);
            actual_prices.push(prices[t + 1]);
            predicted_prices.push(current_price);
        }

        let metrics = ErrorMetrics::compute(&actual_prices, &predicted_prices)?;

        Ok(ForecastResult {
            memory,
            train_returns_count,
            actual_returns,
            predicted_returns,
            actual_prices,
            predicted_prices,
            metrics,
        })
    }

    /// Train pattern rules of depth `memory` on the training prefix, then walk forward
    pub fn train_and_forecast(
        &self,
        series: &EncodedSeries,
        train_returns_count: usize,
        memory: usize,
        alpha: f64,
    ) -> Result<ForecastResult> {
        let trainer = RuleTrainer::new(memory, alpha)?;

        if train_returns_count <= memory || train_returns_count >= series.len() {
            return Err(ForecastError::ValidationError(format!(
                "Training size ({}) must be greater than memory ({}) and less than the number of returns ({})",
                train_returns_count,
                memory,
                series.len()
            )));
        }

        let model = trainer.train(
            &series.states()[..train_returns_count],
            &series.returns()[..train_returns_count],
        )?;

        self.walk_forward(series, &model, train_returns_count)
    }
}
