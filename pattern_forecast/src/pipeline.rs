//! End-to-end run: encode prices, split, search depths, align dates

use crate::config::ForecastConfig;
use crate::data::PriceSeries;
use crate::error::Result;
use crate::grid_search::{train_returns_count, GridSearch, GridSearchOutcome};
use crate::series::EncodedSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::metrics::{relative_percent, relative_squared_percent};
use std::sync::atomic::AtomicBool;
use tracing::info;

/// One forecast step of the winning depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Date of the observed price, when known
    pub date: Option<NaiveDate>,
    /// Observed price
    pub actual_price: f64,
    /// Predicted price
    pub predicted_price: f64,
}

/// Error metrics of the winner relative to the scale of the observed prices.
///
/// `None` when the observed prices are all (numerically) zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeErrors {
    /// MAE over mean absolute price, in percent
    pub mae_percent: Option<f64>,
    /// MSE over mean squared price, in percent
    pub mse_percent: Option<f64>,
    /// RMSE over mean absolute price, in percent
    pub rmse_percent: Option<f64>,
}

/// Everything a forecast run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Configuration of the run
    pub config: ForecastConfig,
    /// Number of returns used for training
    pub train_returns_count: usize,
    /// Best depth and the scores of every depth
    pub outcome: GridSearchOutcome,
    /// Dates aligned with the winner's forecast steps
    pub dates: Vec<Option<NaiveDate>>,
    /// Scale-relative errors of the winner
    pub relative: RelativeErrors,
}

impl ForecastReport {
    /// Memory depth of the winner
    pub fn best_memory(&self) -> usize {
        self.outcome.best.memory
    }

    /// Forecast steps of the winner with their dates
    pub fn points(&self) -> Vec<ForecastPoint> {
        let best = &self.outcome.best;
        best.actual_prices
            .iter()
            .zip(best.predicted_prices.iter())
            .enumerate()
            .map(|(i, (&actual_price, &predicted_price))| ForecastPoint {
                date: self.dates.get(i).copied().flatten(),
                actual_price,
                predicted_price,
            })
            .collect()
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the forecast over a loaded price series
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

impl ForecastPipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run the full forecast
    pub fn run(&self, prices: &PriceSeries) -> Result<ForecastReport> {
        self.run_cancellable(prices, &AtomicBool::new(false))
    }

    /// Run the full forecast, stopping early once `cancel` is set
    pub fn run_cancellable(
        &self,
        prices: &PriceSeries,
        cancel: &AtomicBool,
    ) -> Result<ForecastReport> {
        let series = EncodedSeries::encode(prices.prices(), self.config.k)?;
        let train = train_returns_count(series.len(), self.config.train_percent)?;

        info!(
            prices = prices.len(),
            returns = series.len(),
            train_returns = train,
            "starting memory depth search"
        );

        let outcome = GridSearch::new(self.config.max_memory, self.config.alpha)?
            .parallel(self.config.parallel)
            .run_cancellable(&series, train, cancel)?;

        let dates = align_dates(prices.dates(), train, outcome.best.len());

        let best = &outcome.best;
        let relative = RelativeErrors {
            mae_percent: relative_percent(best.metrics.mae, &best.actual_prices),
            mse_percent: relative_squared_percent(best.metrics.mse, &best.actual_prices),
            rmse_percent: relative_percent(best.metrics.rmse, &best.actual_prices),
        };

        Ok(ForecastReport {
            config: self.config.clone(),
            train_returns_count: train,
            outcome,
            dates,
            relative,
        })
    }
}

/// Date of each forecast step: step `i` predicts the price at `train + 1 + i`
fn align_dates(
    dates: &[Option<NaiveDate>],
    train_returns_count: usize,
    steps: usize,
) -> Vec<Option<NaiveDate>> {
    (0..steps)
        .map(|i| dates.get(train_returns_count + 1 + i).copied().flatten())
        .collect()
}
