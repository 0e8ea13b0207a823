//! Grid search over memory depth
//!
//! Every depth `m = 1..=max_memory` with `m < train_returns_count` is trained,
//! forecast and scored by RMSE. The depth with the strictly smallest RMSE is
//! kept, so on an exact tie the smallest depth wins.

use crate::error::{ForecastError, Result};
use crate::forecaster::{ForecastResult, Forecaster};
use crate::series::EncodedSeries;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Number of training returns for a series of `return_count` returns.
///
/// `round(return_count * (train_percent / 100))` with halves rounded away
/// from zero, clamped to `[2, return_count - 1]`. The fraction is formed
/// first, so `45 * 0.7` lands just below 31.5 and rounds to 31.
pub fn train_returns_count(return_count: usize, train_percent: f64) -> Result<usize> {
    if !(train_percent > 0.0 && train_percent < 100.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Training percentage must be in (0, 100), got {}",
            train_percent
        )));
    }

    if return_count < 3 {
        return Err(ForecastError::ValidationError(format!(
            "At least 3 returns are needed to split training and evaluation, got {}",
            return_count
        )));
    }

    let raw = (return_count as f64 * (train_percent / 100.0)).round() as usize;

    Ok(raw.clamp(2, return_count - 1))
}

/// Scores of one evaluated depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthScore {
    /// Memory depth
    pub memory: usize,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error, in percent
    pub mape_percent: f64,
}

impl From<&ForecastResult> for DepthScore {
    fn from(result: &ForecastResult) -> Self {
        Self {
            memory: result.memory,
            mae: result.metrics.mae,
            mse: result.metrics.mse,
            rmse: result.metrics.rmse,
            mape_percent: result.metrics.mape_percent,
        }
    }
}

/// Winner of a grid search plus the scores of every evaluated depth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSearchOutcome {
    /// Result with the lowest RMSE
    pub best: ForecastResult,
    /// One entry per evaluated depth, in depth order
    pub scores: Vec<DepthScore>,
}

/// Grid search over memory depths `1..=max_memory`
#[derive(Debug, Clone)]
pub struct GridSearch {
    max_memory: usize,
    alpha: f64,
    parallel: bool,
    forecaster: Forecaster,
}

impl GridSearch {
    /// Create a sequential grid search
    pub fn new(max_memory: usize, alpha: f64) -> Result<Self> {
        if max_memory < 1 {
            return Err(ForecastError::InvalidParameter(
                "Maximum memory must be >= 1".to_string(),
            ));
        }

        if !alpha.is_finite() || alpha < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Alpha must be non-negative, got {}",
                alpha
            )));
        }

        Ok(Self {
            max_memory,
            alpha,
            parallel: false,
            forecaster: Forecaster::new(),
        })
    }

    /// Evaluate depths on the rayon thread pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Get the largest depth tried
    pub fn max_memory(&self) -> usize {
        self.max_memory
    }

    /// Depths that can be trained with `train_returns_count` training returns
    pub fn candidate_depths(&self, train_returns_count: usize) -> Vec<usize> {
        (1..=self.max_memory)
            .take_while(|&m| m < train_returns_count)
            .collect()
    }

    /// Run the search
    pub fn run(
        &self,
        series: &EncodedSeries,
        train_returns_count: usize,
    ) -> Result<GridSearchOutcome> {
        self.run_cancellable(series, train_returns_count, &AtomicBool::new(false))
    }

    /// Run the search, checking `cancel` before each depth
    pub fn run_cancellable(
        &self,
        series: &EncodedSeries,
        train_returns_count: usize,
        cancel: &AtomicBool,
    ) -> Result<GridSearchOutcome> {
        let depths = self.candidate_depths(train_returns_count);

        let evaluate = |memory: usize| -> Result<ForecastResult> {
            if cancel.load(Ordering::Relaxed) {
                return Err(ForecastError::Cancelled);
            }

            let result =
                self.forecaster
                    .train_and_forecast(series, train_returns_count, memory, self.alpha)?;
            debug!(memory, rmse = result.metrics.rmse, "evaluated memory depth");
            Ok(result)
        };

        let results: Vec<ForecastResult> = if self.parallel {
            depths
                .par_iter()
                .map(|&memory| evaluate(memory))
                .collect::<Result<Vec<_>>>()?
        } else {
            depths
                .iter()
                .map(|&memory| evaluate(memory))
                .collect::<Result<Vec<_>>>()?
        };

        let scores: Vec<DepthScore> = results.iter().map(DepthScore::from).collect();

        let mut best: Option<ForecastResult> = None;
        for result in results {
            let better = match &best {
                None => true,
                Some(current) => result.metrics.rmse < current.metrics.rmse,
            };
            if better {
                best = Some(result);
            }
        }

        let best = best.ok_or_else(|| {
            ForecastError::SearchExhausted(format!(
                "No memory depth in 1..={} is below the training size {}",
                self.max_memory, train_returns_count
            ))
        })?;

        info!(
            memory = best.memory,
            rmse = best.metrics.rmse,
            depths = scores.len(),
            "selected memory depth"
        );

        Ok(GridSearchOutcome { best, scores })
    }
}
