//! # Sprint Forecast
//!
//! Forecasting of sprint cost, estimated business value and ROI from a
//! project's sprint history.
//!
//! ## Features
//!
//! - Linear trend over sprint index with optional additive seasonality
//! - Confidence intervals that widen with the forecast horizon
//! - Back-testing on the most recent sprints with MAE and MAPE
//!
//! Sprints missing from the history, and sprints whose ROI is undefined, are
//! skipped when fitting. They are never treated as zero.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sprint_forecast::{
//!     EvaluationConfig, ForecastConfig, ForecastEngine, ForecastEvaluator, ForecastMetric,
//! };
//! use sprint_metrics::{build_project_series, utils::generate_test_records, SeriesConfig};
//!
//! let records = generate_test_records(12, 10_000.0, 250.0, 40.0, 0.05, 7);
//! let series = build_project_series(&records, &SeriesConfig::default())?;
//!
//! let forecast = ForecastEngine::new().forecast(
//!     &series,
//!     ForecastMetric::Cost,
//!     &ForecastConfig::default().with_horizon(3),
//! )?;
//! for point in forecast.points() {
//!     println!(
//!         "sprint {}: {:.0} [{:.0}, {:.0}]",
//!         point.sprint_index, point.value, point.lower, point.upper
//!     );
//! }
//!
//! let report = ForecastEvaluator::new().evaluate(
//!     &series,
//!     ForecastMetric::Cost,
//!     &EvaluationConfig::default(),
//! )?;
//! println!(
//!     "MAE {:?}, MAPE {}",
//!     report.mean_absolute_error, report.mean_absolute_percentage_error
//! );
//! # Ok::<(), sprint_forecast::ForecastError>(())
//! ```

pub mod confidence;
pub mod config;
pub mod data;
pub mod decomposition;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use crate::config::{
    EngineConfig, EvaluationConfig, ForecastConfig, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_HORIZON,
    MIN_HISTORY,
};
pub use crate::data::{ForecastMetric, MetricSeries, Observation};
pub use crate::decomposition::SeasonalComponent;
pub use crate::engine::{Forecast, ForecastEngine, ForecastPoint};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluator::{
    BacktestStatus, ForecastAccuracyReport, ForecastEvaluator, HeldOutPrediction,
};
pub use crate::models::{ForecastModel, TrainedForecastModel, TrendComponent};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
