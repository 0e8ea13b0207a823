//! Forecasting models for encoded price series

use crate::error::Result;
use series_math::State;
use std::fmt::Debug;

/// Trained forecast model mapping a trailing state window to a prediction
pub trait TrainedForecastModel: Debug {
    /// Number of trailing states the model conditions on
    fn memory(&self) -> usize;

    /// Most likely next state after `window` (the last `memory` states)
    fn predict_state(&self, window: &[State]) -> State;

    /// Return associated with a predicted state
    fn predicted_return(&self, state: State) -> f64;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on aligned states and returns
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a training prefix of states and their returns
    fn train(&self, states: &[State], returns: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod pattern;
pub mod rules;

pub use pattern::{Pattern, MAX_PACKED_MEMORY};
pub use rules::{Distribution, RuleModel, RuleTrainer};
