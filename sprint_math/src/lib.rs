//! # Sprint Math
//!
//! Numeric building blocks for sprint financial analysis.
//! This crate knows nothing about sprints: it provides the undefined-aware
//! [`Ratio`] type, descriptive statistics, moving averages and least-squares
//! regression that the metrics and forecasting crates are built on.

use thiserror::Error;

pub mod moving_averages;
pub mod ratio;
pub mod regression;
pub mod statistics;

pub use ratio::Ratio;
pub use regression::LinearRegression;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
