//! # CA Forecast
//!
//! Workspace facade over [`series_math`] and [`pattern_forecast`].
//!
//! ## Example
//!
//! ```
//! use ca_forecast_workspace::prelude::*;
//!
//! let prices = PriceSeries::from_prices(vec![100.0, 102.0, 101.0, 105.0, 103.0, 108.0]);
//! let config = ForecastConfig {
//!     train_percent: 60.0,
//!     k: 0.0,
//!     max_memory: 2,
//!     ..ForecastConfig::default()
//! };
//!
//! let report = ForecastPipeline::new(config).unwrap().run(&prices).unwrap();
//! assert_eq!(report.outcome.best.len(), 2);
//! ```

pub use pattern_forecast;
pub use series_math;

/// Types needed for a typical forecast run
pub mod prelude {
    pub use pattern_forecast::{
        CsvSettings, DataLoader, DepthScore, ForecastConfig, ForecastError, ForecastPipeline,
        ForecastReport, ForecastResult, GridSearch, PriceSeries,
    };
    pub use series_math::{ErrorMetrics, State};
}
