//! Pattern rule model: trailing state window -> next-state distribution
//!
//! Training counts, for every window of `memory` states in the training
//! prefix, which state followed it. Counts are turned into probabilities with
//! additive (Laplace) smoothing, so unseen transitions keep a positive
//! probability whenever `alpha > 0`. Windows never seen in training fall back
//! to the smoothed distribution of all next states.

use crate::error::{ForecastError, Result};
use crate::models::pattern::Pattern;
use crate::models::{ForecastModel, TrainedForecastModel};
use serde::{Deserialize, Serialize};
use series_math::State;
use std::collections::HashMap;
use tracing::debug;

/// Probability distribution over the three states, in `State::ALL` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    probabilities: [f64; 3],
}

impl Distribution {
    /// Equal probability for every state
    pub fn uniform() -> Self {
        Self {
            probabilities: [1.0 / 3.0; 3],
        }
    }

    /// Smooth next-state counts: `p_i = (count_i + alpha) / sum_j(count_j + alpha)`.
    ///
    /// Falls back to uniform when the smoothed total is not positive.
    pub fn from_counts(counts: [usize; 3], alpha: f64) -> Self {
        let adjusted = counts.map(|c| c as f64 + alpha);
        let total: f64 = adjusted.iter().sum();

        if !(total > 0.0) {
            return Self::uniform();
        }

        Self {
            probabilities: adjusted.map(|a| a / total),
        }
    }

    /// Probability of `state`
    pub fn probability(&self, state: State) -> f64 {
        self.probabilities[state.index()]
    }

    /// All three probabilities
    pub fn probabilities(&self) -> [f64; 3] {
        self.probabilities
    }

    /// State with the strictly greatest probability.
    ///
    /// On an exact tie the lowest index wins: `Down` over `Neutral` over `Up`.
    pub fn most_likely(&self) -> State {
        let mut best = 0;
        for i in 1..self.probabilities.len() {
            if self.probabilities[i] > self.probabilities[best] {
                best = i;
            }
        }

        State::ALL[best]
    }
}

/// Trainer for pattern rule models
#[derive(Debug, Clone)]
pub struct RuleTrainer {
    /// Name of the model
    name: String,
    /// Window length
    memory: usize,
    /// Smoothing strength
    alpha: f64,
}

impl RuleTrainer {
    /// Create a trainer for windows of `memory` states with smoothing `alpha`
    pub fn new(memory: usize, alpha: f64) -> Result<Self> {
        if memory < 1 {
            return Err(ForecastError::InvalidParameter(
                "Memory must be >= 1".to_string(),
            ));
        }

        if !alpha.is_finite() || alpha < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Alpha must be non-negative, got {}",
                alpha
            )));
        }

        Ok(Self {
            name: format!("Pattern Rules (m={}, alpha={})", memory, alpha),
            memory,
            alpha,
        })
    }

    /// Get the window length
    pub fn memory(&self) -> usize {
        self.memory
    }

    /// Get the smoothing strength
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ForecastModel for RuleTrainer {
    type Trained = RuleModel;

    fn train(&self, states: &[State], returns: &[f64]) -> Result<Self::Trained> {
        if states.len() != returns.len() {
            return Err(ForecastError::ValidationError(format!(
                "States length ({}) doesn't match returns length ({})",
                states.len(),
                returns.len()
            )));
        }

        if states.len() <= self.memory {
            return Err(ForecastError::ValidationError(format!(
                "Training range of {} states is too short for memory {}",
                states.len(),
                self.memory
            )));
        }

        let mut counts: HashMap<Pattern, [usize; 3]> = HashMap::new();
        let mut global_counts = [0usize; 3];

        for window in states.windows(self.memory + 1) {
            let (head, next) = window.split_at(self.memory);
            let pattern = Pattern::from_states(head).ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Cannot build a pattern of length {}",
                    head.len()
                ))
            })?;
            let next_index = next[0].index();

            counts.entry(pattern).or_insert([0; 3])[next_index] += 1;
            global_counts[next_index] += 1;
        }

        let transitions: HashMap<Pattern, Distribution> = counts
            .into_iter()
            .map(|(pattern, c)| (pattern, Distribution::from_counts(c, self.alpha)))
            .collect();

        let fallback = Distribution::from_counts(global_counts, self.alpha);
        let mean_returns = mean_returns_by_state(states, returns);

        debug!(
            memory = self.memory,
            patterns = transitions.len(),
            observations = states.len() - self.memory,
            "trained pattern rules"
        );

        Ok(RuleModel {
            name: self.name.clone(),
            memory: self.memory,
            alpha: self.alpha,
            transitions,
            fallback,
            mean_returns,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Mean return per state over the whole supplied sequence, 0.0 for an absent state
fn mean_returns_by_state(states: &[State], returns: &[f64]) -> [f64; 3] {
    let mut sums = [0.0; 3];
    let mut counts = [0usize; 3];

    for (state, &value) in states.iter().zip(returns.iter()) {
        sums[state.index()] += value;
        counts[state.index()] += 1;
    }

    let mut means = [0.0; 3];
    for i in 0..3 {
        if counts[i] > 0 {
            means[i] = sums[i] / counts[i] as f64;
        }
    }

    means
}

/// Trained pattern rule model. Immutable once built.
#[derive(Debug, Clone)]
pub struct RuleModel {
    name: String,
    memory: usize,
    alpha: f64,
    transitions: HashMap<Pattern, Distribution>,
    fallback: Distribution,
    mean_returns: [f64; 3],
}

impl RuleModel {
    /// Smoothing strength the model was trained with
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Distribution for an observed pattern, if any
    pub fn transition(&self, pattern: &Pattern) -> Option<&Distribution> {
        self.transitions.get(pattern)
    }

    /// Distribution used for a window: the pattern's own, else the fallback
    pub fn distribution_for(&self, window: &[State]) -> &Distribution {
        Pattern::from_states(window)
            .and_then(|pattern| self.transitions.get(&pattern))
            .unwrap_or(&self.fallback)
    }

    /// Distribution over all next states observed in training
    pub fn fallback(&self) -> &Distribution {
        &self.fallback
    }

    /// Mean training return of `state`
    pub fn mean_return(&self, state: State) -> f64 {
        self.mean_returns[state.index()]
    }

    /// Number of distinct patterns observed in training
    pub fn pattern_count(&self) -> usize {
        self.transitions.len()
    }

    /// Observed patterns and their distributions, ordered by pattern
    pub fn rules(&self) -> Vec<(Pattern, Distribution)> {
        let mut rules: Vec<(Pattern, Distribution)> = self
            .transitions
            .iter()
            .map(|(pattern, dist)| (pattern.clone(), *dist))
            .collect();
        rules.sort_by(|a, b| a.0.cmp(&b.0));
        rules
    }
}

impl TrainedForecastModel for RuleModel {
    fn memory(&self) -> usize {
        self.memory
    }

    fn predict_state(&self, window: &[State]) -> State {
        self.distribution_for(window).most_likely()
    }

    fn predicted_return(&self, state: State) -> f64 {
        self.mean_return(state)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
