//! Error types for the sprint_metrics crate

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Field of a sprint record that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    SprintIndex,
    EndDate,
    Cost,
    EstimatedBusinessValue,
    ActualBusinessValue,
    Velocity,
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricField::SprintIndex => "sprint_index",
            MetricField::EndDate => "end_date",
            MetricField::Cost => "sprint_cost",
            MetricField::EstimatedBusinessValue => "estimated_business_value",
            MetricField::ActualBusinessValue => "actual_business_value",
            MetricField::Velocity => "velocity",
        };
        f.write_str(name)
    }
}

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("value must not be negative")]
    Negative,

    #[error("value must be a finite number (got NaN or infinity)")]
    NotFinite,

    #[error("value is out of range")]
    OutOfRange,

    #[error("end date is before start date")]
    EndBeforeStart,

    #[error("sprint index appears more than once")]
    DuplicateIndex,
}

/// Custom error types for the sprint_metrics crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// A single record carries a bad value; the caller can correct it
    #[error("Invalid metric `{field}` for sprint {sprint_id}: {reason}")]
    InvalidMetric {
        sprint_id: String,
        field: MetricField,
        reason: InvalidReason,
    },

    /// No sprints were supplied
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A configuration value is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl MetricsError {
    pub(crate) fn invalid(sprint_id: &str, field: MetricField, reason: InvalidReason) -> Self {
        MetricsError::InvalidMetric {
            sprint_id: sprint_id.to_string(),
            field,
            reason,
        }
    }

    /// The offending field, for `InvalidMetric` errors
    pub fn field(&self) -> Option<MetricField> {
        match self {
            MetricsError::InvalidMetric { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, MetricsError>;
