//! Error types for the sprint_forecast crate

use sprint_math::MathError;
use sprint_metrics::MetricsError;
use thiserror::Error;

/// Custom error types for the sprint_forecast crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// Horizon is zero or longer than the available history
    #[error(
        "Invalid horizon {horizon}: must be between 1 and the {available} observations of history"
    )]
    InvalidHorizon { horizon: usize, available: usize },

    /// Too few observations to fit a forecast
    #[error(
        "Insufficient history: forecasting needs at least {required} observations, have {available}"
    )]
    InsufficientHistory { required: usize, available: usize },

    /// A configuration value is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Inputs to an accuracy calculation do not line up
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A configuration document could not be parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Math(#[from] MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
