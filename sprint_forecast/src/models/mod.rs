//! Forecasting models for sprint metric series

use crate::data::MetricSeries;
use crate::error::Result;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Point prediction for a sprint, inside or beyond the training range
    fn predict(&self, sprint_index: u32) -> f64;

    /// Standard deviation of the in-sample residuals
    fn residual_std_dev(&self) -> f64;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a metric series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a metric series
    fn train(&self, data: &MetricSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod decomposed_trend;

pub use decomposed_trend::{DecomposedTrend, TrainedDecomposedTrend, TrendComponent};
