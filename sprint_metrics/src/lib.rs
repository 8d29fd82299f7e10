//! # Sprint Metrics
//!
//! `sprint_metrics` turns raw per-sprint financial records into validated
//! metrics and rolls them up into a project-level series.
//!
//! ## Pipeline
//!
//! - **Validation**: [`MetricsValidator`] rejects negative, NaN and infinite
//!   amounts, negative velocity, inverted dates and duplicate sprint indices
//! - **ROI**: [`RoiCalculator`] derives ROI, realized ROI and their variance;
//!   zero cost yields an undefined ROI rather than zero
//! - **Aggregation**: [`HistoryAggregator`] orders sprints, summarises cost and
//!   ROI, smooths ROI with a moving average and flags index gaps as warnings
//!
//! ## Usage Example
//!
//! ```no_run
//! use sprint_metrics::{HistoryAggregator, MetricsValidator, SprintMetrics};
//! use sprint_metrics::utils::generate_test_records;
//!
//! let records = generate_test_records(10, 1000.0, 25.0, 30.0, 0.1, 1);
//! let validated = MetricsValidator.validate_batch(&records).unwrap();
//! let metrics = validated.into_iter().map(SprintMetrics::new).collect();
//!
//! let series = HistoryAggregator::default().aggregate(metrics).unwrap();
//! println!("Mean ROI: {}", series.summary().mean_roi);
//! ```

pub mod aggregator;
pub mod error;
pub mod record;
pub mod roi;
pub mod series;
pub mod utils;
pub mod validator;

pub use aggregator::{HistoryAggregator, SeriesConfig, DEFAULT_MOVING_AVERAGE_WINDOW};
pub use error::{InvalidReason, MetricField, MetricsError, Result};
pub use record::{SprintFinancialRecord, SprintMetrics, ValidatedRecord};
pub use roi::{RoiBand, RoiBreakdown, RoiCalculator, HIGH_ROI_THRESHOLD, ROI_DECIMAL_PLACES};
pub use series::{ProjectFinancialSeries, SeriesSummary, SeriesWarning};
pub use sprint_math::Ratio;
pub use validator::MetricsValidator;

/// Validate one record and derive its metrics
pub fn compute_sprint_metrics(record: &SprintFinancialRecord) -> Result<SprintMetrics> {
    MetricsValidator.validate(record).map(SprintMetrics::new)
}

/// Validate a batch of records and aggregate them into a project series
pub fn build_project_series(
    records: &[SprintFinancialRecord],
    config: &SeriesConfig,
) -> Result<ProjectFinancialSeries> {
    let aggregator = HistoryAggregator::from_config(config)?;
    let metrics = MetricsValidator
        .validate_batch(records)?
        .into_iter()
        .map(SprintMetrics::new)
        .collect();
    aggregator.aggregate(metrics)
}
