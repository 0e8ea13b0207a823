//! Forecast configuration
//!
//! Loaded from TOML, every field optional:
//!
//! ```toml
//! train_percent = 70.0
//! k = 0.002
//! alpha = 1.0
//! max_memory = 8
//! parallel = false
//! ```

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_train_percent() -> f64 {
    70.0
}

fn default_k() -> f64 {
    0.002
}

fn default_alpha() -> f64 {
    1.0
}

fn default_max_memory() -> usize {
    8
}

/// Parameters of a forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Share of returns used for training, in percent, strictly inside (0, 100)
    #[serde(default = "default_train_percent")]
    pub train_percent: f64,
    /// Neutral band half-width for state encoding
    #[serde(default = "default_k")]
    pub k: f64,
    /// Laplace smoothing strength
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Largest memory depth tried by the grid search
    #[serde(default = "default_max_memory")]
    pub max_memory: usize,
    /// Evaluate depths in parallel
    #[serde(default)]
    pub parallel: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            train_percent: default_train_percent(),
            k: default_k(),
            alpha: default_alpha(),
            max_memory: default_max_memory(),
            parallel: false,
        }
    }
}

impl ForecastConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every parameter range
    pub fn validate(&self) -> Result<()> {
        if !(self.train_percent > 0.0 && self.train_percent < 100.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "train_percent must be in (0, 100), got {}",
                self.train_percent
            )));
        }

        if !self.k.is_finite() || self.k < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "k must be non-negative, got {}",
                self.k
            )));
        }

        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }

        if self.max_memory < 1 {
            return Err(ForecastError::InvalidParameter(
                "max_memory must be >= 1".to_string(),
            ));
        }

        Ok(())
    }
}
