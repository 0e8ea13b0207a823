//! Ternary state encoding of returns
//!
//! Each return is quantized into one of three symbols by comparing it
//! against a non-negative threshold `k`:
//! - return > k  -> `Up`
//! - return < -k -> `Down`
//! - otherwise   -> `Neutral`

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a single return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum State {
    /// Return below `-k`
    Down,
    /// Return inside `[-k, k]`
    Neutral,
    /// Return above `k`
    Up,
}

impl State {
    /// All states in index order. Index order is also the tie-break order.
    pub const ALL: [State; 3] = [State::Down, State::Neutral, State::Up];

    /// Position of the state in `ALL` (0, 1, 2)
    pub fn index(self) -> usize {
        match self {
            State::Down => 0,
            State::Neutral => 1,
            State::Up => 2,
        }
    }

    /// Inverse of [`State::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Symbolic value of the state (-1, 0, +1)
    pub fn value(self) -> i8 {
        match self {
            State::Down => -1,
            State::Neutral => 0,
            State::Up => 1,
        }
    }

    /// Inverse of [`State::value`]
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            -1 => Some(State::Down),
            0 => Some(State::Neutral),
            1 => Some(State::Up),
            _ => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Threshold encoder mapping returns to states
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateEncoder {
    k: f64,
}

impl StateEncoder {
    /// Create a new encoder with the neutral band half-width `k`
    pub fn new(k: f64) -> Result<Self> {
        if !k.is_finite() || k < 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Threshold k must be a non-negative number, got {}",
                k
            )));
        }

        Ok(Self { k })
    }

    /// Get the threshold
    pub fn threshold(&self) -> f64 {
        self.k
    }

    /// Encode a single return
    pub fn encode_one(&self, value: f64) -> State {
        if value > self.k {
            State::Up
        } else if value < -self.k {
            State::Down
        } else {
            State::Neutral
        }
    }

    /// Encode a return series, one state per return
    pub fn encode(&self, returns: &[f64]) -> Vec<State> {
        returns.iter().map(|&r| self.encode_one(r)).collect()
    }
}

/// Encode `returns` with threshold `k`
///
/// # Examples
///
/// ```
/// use series_math::{encode_states, State};
///
/// let states = encode_states(&[0.01, -0.0005, -0.02], 0.001).unwrap();
/// assert_eq!(states, vec![State::Up, State::Neutral, State::Down]);
/// ```
pub fn encode_states(returns: &[f64], k: f64) -> Result<Vec<State>> {
    Ok(StateEncoder::new(k)?.encode(returns))
}
