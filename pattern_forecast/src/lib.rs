//! # Pattern Forecast
//!
//! Pattern-conditioned forecasting of financial price series.
//!
//! ## Features
//!
//! - Ternary state encoding of log-returns (down / neutral / up)
//! - Laplace-smoothed next-state rules keyed by the last `m` states
//! - Walk-forward compounding price forecast over an evaluation range
//! - MAE, MSE, RMSE and MAPE scoring
//! - Grid search over memory depth, sequential or on the rayon pool
//! - Tolerant CSV import and CSV/JSON reports
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pattern_forecast::config::ForecastConfig;
//! use pattern_forecast::data::{CsvSettings, DataLoader};
//! use pattern_forecast::pipeline::ForecastPipeline;
//!
//! # fn main() -> pattern_forecast::error::Result<()> {
//! // Load close prices
//! let prices = DataLoader::from_csv("prices.csv", &CsvSettings::default())?;
//!
//! // Search memory depths 1..=8 on a 70/30 split
//! let pipeline = ForecastPipeline::new(ForecastConfig::default())?;
//! let report = pipeline.run(&prices)?;
//!
//! println!("Best memory: {}", report.best_memory());
//! println!("{}", report.outcome.best.metrics);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod forecaster;
pub mod grid_search;
pub mod models;
pub mod pipeline;
pub mod series;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{CsvSettings, DataLoader, PriceSeries};
pub use crate::error::ForecastError;
pub use crate::forecaster::{ForecastResult, Forecaster};
pub use crate::grid_search::{train_returns_count, DepthScore, GridSearch, GridSearchOutcome};
pub use crate::models::{Distribution, ForecastModel, RuleModel, RuleTrainer, TrainedForecastModel};
pub use crate::pipeline::{ForecastPipeline, ForecastPoint, ForecastReport};
pub use crate::series::EncodedSeries;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
