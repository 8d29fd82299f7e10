//! # Sprint Ledger
//!
//! Sprint financial metrics and forecasting for Agile projects.
//!
//! This crate bundles the workspace crates behind four operations:
//!
//! - [`compute_sprint_metrics`] validates one sprint record and derives its ROI
//! - [`build_project_series`] aggregates a project's records into an ordered history
//! - [`forecast`] projects cost, estimated value or ROI over the coming sprints
//! - [`evaluate_forecast`] back-tests the forecast on the latest sprints
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use sprint_ledger::{build_project_series, forecast, ForecastMetric, SprintFinancialRecord};
//!
//! let day0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let records: Vec<SprintFinancialRecord> = (0..6)
//!     .map(|i| {
//!         let start = day0 + chrono::Duration::days(14 * i as i64);
//!         let end = start + chrono::Duration::days(13);
//!         let cost = 1000.0 + 50.0 * i as f64;
//!         SprintFinancialRecord::new(format!("S{}", i), i, start, end, cost, 1500.0, 30)
//!     })
//!     .collect();
//!
//! let series = build_project_series(&records).unwrap();
//! let cost = forecast(&series, ForecastMetric::Cost, 2, 0.95, None).unwrap();
//! assert_eq!(cost.points()[0].sprint_index, 6);
//! assert!((cost.points()[0].value - 1300.0).abs() < 1e-6);
//! ```

use serde::Serialize;
use tracing::debug;

pub use sprint_forecast::{
    BacktestStatus, EngineConfig, EvaluationConfig, Forecast, ForecastAccuracyReport,
    ForecastConfig, ForecastEngine, ForecastError, ForecastEvaluator, ForecastMetric,
    ForecastPoint, HeldOutPrediction, MetricSeries, Observation, SeasonalComponent,
    TrendComponent,
};
pub use sprint_math::Ratio;
pub use sprint_metrics::{
    HistoryAggregator, InvalidReason, MetricField, MetricsError, MetricsValidator,
    ProjectFinancialSeries, RoiBand, RoiBreakdown, RoiCalculator, SeriesConfig, SeriesSummary,
    SeriesWarning, SprintFinancialRecord, SprintMetrics, HIGH_ROI_THRESHOLD,
};

/// Validate one sprint record and derive its metrics
pub fn compute_sprint_metrics(
    record: &SprintFinancialRecord,
) -> Result<SprintMetrics, MetricsError> {
    sprint_metrics::compute_sprint_metrics(record)
}

/// Build a project series with the default moving-average window
pub fn build_project_series(
    records: &[SprintFinancialRecord],
) -> Result<ProjectFinancialSeries, MetricsError> {
    build_project_series_with(records, &SeriesConfig::default())
}

pub fn build_project_series_with(
    records: &[SprintFinancialRecord],
    config: &SeriesConfig,
) -> Result<ProjectFinancialSeries, MetricsError> {
    sprint_metrics::build_project_series(records, config)
}

/// Forecast `metric` for the next `horizon` sprints
pub fn forecast(
    series: &ProjectFinancialSeries,
    metric: ForecastMetric,
    horizon: usize,
    confidence_level: f64,
    seasonal_period: Option<usize>,
) -> Result<Forecast, ForecastError> {
    let config = ForecastConfig {
        horizon,
        confidence_level,
        seasonal_period,
    };
    ForecastEngine::new().forecast(series, metric, &config)
}

/// Back-test forecasts of `metric`; `holdout` defaults to `min(3, observations / 4)`
pub fn evaluate_forecast(
    series: &ProjectFinancialSeries,
    metric: ForecastMetric,
    holdout: Option<usize>,
) -> Result<ForecastAccuracyReport, ForecastError> {
    let config = EvaluationConfig {
        holdout,
        ..EvaluationConfig::default()
    };
    ForecastEvaluator::new().evaluate(series, metric, &config)
}

/// A forecast together with the back-test of the same model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedForecast {
    pub forecast: Forecast,
    pub accuracy: ForecastAccuracyReport,
    /// Set when the back-test could not be run
    pub low_confidence: bool,
}

impl EvaluatedForecast {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Forecast `metric` and back-test it with the same seasonal period
pub fn forecast_with_evaluation(
    series: &ProjectFinancialSeries,
    metric: ForecastMetric,
    config: &EngineConfig,
) -> Result<EvaluatedForecast, ForecastError> {
    config.validate()?;

    let forecast = ForecastEngine::new().forecast(series, metric, &config.forecast)?;
    let evaluation = EvaluationConfig {
        seasonal_period: config.evaluation.seasonal_period.or(config.forecast.seasonal_period),
        ..config.evaluation
    };
    let accuracy = ForecastEvaluator::new().evaluate(series, metric, &evaluation)?;
    let low_confidence = accuracy.is_low_confidence();

    debug!(metric = %metric, low_confidence, "Forecast evaluated");

    Ok(EvaluatedForecast {
        forecast,
        accuracy,
        low_confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;

    fn records(costs: &[f64], value: f64) -> Vec<SprintFinancialRecord> {
        let day0 = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        costs
            .iter()
            .enumerate()
            .map(|(i, &cost)| {
                let start = day0 + Duration::days(14 * i as i64);
                SprintFinancialRecord::new(
                    format!("S{}", i + 1),
                    i as u32 + 1,
                    start,
                    start + Duration::days(13),
                    cost,
                    value,
                    25,
                )
            })
            .collect()
    }

    #[test]
    fn test_compute_sprint_metrics() {
        let record = &records(&[1000.0], 1500.0)[0];
        let metrics = compute_sprint_metrics(record).unwrap();

        assert_eq!(metrics.roi(), Ratio::Value(50.0));
        assert_eq!(metrics.roi_label(), "50.00%");
        assert_eq!(metrics.duration_days(), 14);
    }

    #[test]
    fn test_zero_cost_sprint() {
        let record = &records(&[0.0], 1500.0)[0];
        let metrics = compute_sprint_metrics(record).unwrap();

        assert!(metrics.roi().is_undefined());
        assert_eq!(metrics.roi_band(), RoiBand::Undefined);
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(
            build_project_series(&[]),
            Err(MetricsError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_forecast_facade() {
        let costs = [100.0, 110.0, 120.0, 130.0, 140.0];
        let series = build_project_series(&records(&costs, 300.0)).unwrap();
        let cost = forecast(&series, ForecastMetric::Cost, 2, 0.9, None).unwrap();

        assert_eq!(cost.confidence_level(), 0.9);
        assert_eq!(cost.points()[1].sprint_index, 7);
        assert_relative_eq!(cost.points()[1].value, 160.0, epsilon = 1e-9);

        assert!(matches!(
            forecast(&series, ForecastMetric::Cost, 0, 0.9, None),
            Err(ForecastError::InvalidHorizon { .. })
        ));
    }

    #[test]
    fn test_evaluate_forecast_facade() {
        let costs: Vec<f64> = (0..8).map(|i| 100.0 + 10.0 * i as f64).collect();
        let series = build_project_series(&records(&costs, 300.0)).unwrap();

        let default = evaluate_forecast(&series, ForecastMetric::Cost, None).unwrap();
        assert_eq!(default.holdout, 2);
        let explicit = evaluate_forecast(&series, ForecastMetric::Cost, Some(4)).unwrap();
        assert_eq!(explicit.holdout, 4);
        assert_eq!(explicit.status, BacktestStatus::Completed);
    }

    #[test]
    fn test_forecast_with_evaluation() {
        // Four sprints are enough to forecast but leave nothing to back-test on
        let costs: Vec<f64> = (0..4).map(|i| 100.0 + 10.0 * i as f64).collect();
        let series = build_project_series(&records(&costs, 300.0)).unwrap();

        let result =
            forecast_with_evaluation(&series, ForecastMetric::Cost, &EngineConfig::default())
                .unwrap();
        assert_eq!(result.forecast.horizon(), 3);
        assert!(result.low_confidence);

        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["low_confidence"], true);
    }

    #[test]
    fn test_seasonal_period_reaches_back_test() {
        let costs: Vec<f64> = (0..12)
            .map(|i| 1000.0 + 20.0 * i as f64 + if i % 2 == 0 { 50.0 } else { -50.0 })
            .collect();
        let series = build_project_series(&records(&costs, 3000.0)).unwrap();
        let config = EngineConfig {
            forecast: ForecastConfig::default().with_seasonal_period(2),
            ..EngineConfig::default()
        };

        let result = forecast_with_evaluation(&series, ForecastMetric::Cost, &config).unwrap();
        assert!(!result.low_confidence);
        assert!(result.forecast.seasonal().is_some());
        assert_eq!(result.accuracy.status, BacktestStatus::Completed);
        assert_abs_diff_eq!(result.accuracy.mean_absolute_error.unwrap(), 0.0, epsilon = 1e-6);

        // Without the period the alternation shows up as back-test error
        let plain = evaluate_forecast(&series, ForecastMetric::Cost, None).unwrap();
        assert!(plain.mean_absolute_error.unwrap() > 1.0);
    }
}
