//! Back-testing of forecasts against held-out sprints

use crate::config::{EvaluationConfig, MIN_HISTORY};
use crate::data::{ForecastMetric, MetricSeries};
use crate::error::Result;
use crate::metrics::{mean_absolute_error, mean_absolute_percentage_error, percentage_errors};
use crate::models::{DecomposedTrend, ForecastModel, TrainedForecastModel};
use serde::Serialize;
use sprint_math::Ratio;
use sprint_metrics::ProjectFinancialSeries;
use tracing::{debug, warn};

/// Outcome of a back-test
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BacktestStatus {
    Completed,
    /// The history was too short to hold anything out
    InsufficientData { reason: String },
}

/// Prediction for one held-out sprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeldOutPrediction {
    pub sprint_index: u32,
    pub actual: f64,
    pub predicted: f64,
    pub absolute_error: f64,
    /// Undefined when the actual value is zero
    pub percentage_error: Ratio,
}

/// Accuracy of a forecast model on the most recent sprints of a history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastAccuracyReport {
    pub metric: ForecastMetric,
    pub status: BacktestStatus,
    pub holdout: usize,
    pub training_observations: usize,
    pub mean_absolute_error: Option<f64>,
    pub mean_absolute_percentage_error: Ratio,
    pub predictions: Vec<HeldOutPrediction>,
}

impl ForecastAccuracyReport {
    fn insufficient(
        metric: ForecastMetric,
        holdout: usize,
        observations: usize,
        reason: String,
    ) -> Self {
        Self {
            metric,
            status: BacktestStatus::InsufficientData { reason },
            holdout,
            training_observations: observations.saturating_sub(holdout),
            mean_absolute_error: None,
            mean_absolute_percentage_error: Ratio::Undefined,
            predictions: Vec::new(),
        }
    }

    /// A report without a completed back-test carries no accuracy evidence
    pub fn is_low_confidence(&self) -> bool {
        !matches!(self.status, BacktestStatus::Completed)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Stateless back-tester
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEvaluator;

impl ForecastEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Hold out the latest sprints of `series`, forecast them from the rest and
    /// compare.
    ///
    /// A history too short to back-test yields a report marked
    /// [`BacktestStatus::InsufficientData`] rather than an error.
    pub fn evaluate(
        &self,
        series: &ProjectFinancialSeries,
        metric: ForecastMetric,
        config: &EvaluationConfig,
    ) -> Result<ForecastAccuracyReport> {
        let data = MetricSeries::from_series(series, metric);
        self.evaluate_series(&data, config)
    }

    pub fn evaluate_series(
        &self,
        data: &MetricSeries,
        config: &EvaluationConfig,
    ) -> Result<ForecastAccuracyReport> {
        config.validate()?;

        let metric = data.metric();
        let n = data.len();
        let holdout = config.holdout_for(n);

        if holdout == 0 {
            let reason = format!("no observations can be held out from a history of {}", n);
            warn!(metric = %metric, observations = n, "Back-test skipped: {}", reason);
            return Ok(ForecastAccuracyReport::insufficient(metric, holdout, n, reason));
        }
        if n.saturating_sub(holdout) < MIN_HISTORY {
            let reason = format!(
                "holding out {} of {} observations leaves fewer than {} to train on",
                holdout, n, MIN_HISTORY
            );
            warn!(metric = %metric, observations = n, holdout, "Back-test skipped: {}", reason);
            return Ok(ForecastAccuracyReport::insufficient(metric, holdout, n, reason));
        }

        let (training, held_out) = data.split_holdout(holdout);
        let trained = DecomposedTrend::new(config.seasonal_period)?.train(&training)?;

        let clamp = metric.is_non_negative();
        let predicted: Vec<f64> = held_out
            .iter()
            .map(|o| {
                let value = trained.predict(o.sprint_index);
                if clamp {
                    value.max(0.0)
                } else {
                    value
                }
            })
            .collect();
        let actual: Vec<f64> = held_out.iter().map(|o| o.value).collect();

        let mae = mean_absolute_error(&predicted, &actual)?;
        let mape = mean_absolute_percentage_error(&predicted, &actual)?;
        let pct = percentage_errors(&predicted, &actual)?;

        let predictions = held_out
            .iter()
            .zip(predicted.iter().zip(pct))
            .map(|(o, (&p, percentage_error))| HeldOutPrediction {
                sprint_index: o.sprint_index,
                actual: o.value,
                predicted: p,
                absolute_error: (o.value - p).abs(),
                percentage_error,
            })
            .collect();

        debug!(metric = %metric, holdout, mae, mape = %mape, "Completed back-test");

        Ok(ForecastAccuracyReport {
            metric,
            status: BacktestStatus::Completed,
            holdout,
            training_observations: training.len(),
            mean_absolute_error: Some(mae),
            mean_absolute_percentage_error: mape,
            predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    fn series(metric: ForecastMetric, values: &[(u32, f64)]) -> MetricSeries {
        MetricSeries::from_observations(
            metric,
            values.iter().map(|&(i, v)| Observation::new(i, v)).collect(),
        )
    }

    #[test]
    fn test_linear_history_is_exact() {
        let data: Vec<(u32, f64)> = (0..12).map(|i| (i, 50.0 + 5.0 * i as f64)).collect();
        let report = ForecastEvaluator::new()
            .evaluate_series(&series(ForecastMetric::Cost, &data), &EvaluationConfig::default())
            .unwrap();

        assert_eq!(report.status, BacktestStatus::Completed);
        assert_eq!(report.holdout, 3);
        assert_eq!(report.training_observations, 9);
        assert_abs_diff_eq!(report.mean_absolute_error.unwrap(), 0.0, epsilon = 1e-9);
        let mape = report.mean_absolute_percentage_error.value().unwrap();
        assert_abs_diff_eq!(mape, 0.0, epsilon = 1e-9);
        let indices: Vec<u32> = report.predictions.iter().map(|p| p.sprint_index).collect();
        assert_eq!(indices, vec![9, 10, 11]);
        assert!(!report.is_low_confidence());
    }

    #[test]
    fn test_short_history_is_low_confidence() {
        let data = [(0, 1.0), (1, 2.0), (2, 3.0)];
        let report = ForecastEvaluator::new()
            .evaluate_series(&series(ForecastMetric::Cost, &data), &EvaluationConfig::default())
            .unwrap();

        assert!(report.is_low_confidence());
        assert_eq!(report.holdout, 0);
        assert_eq!(report.mean_absolute_error, None);
        assert!(report.mean_absolute_percentage_error.is_undefined());
    }

    #[test]
    fn test_holdout_leaving_too_little_training() {
        let data: Vec<(u32, f64)> = (0..6).map(|i| (i, i as f64)).collect();
        let config = EvaluationConfig::default().with_holdout(3);
        let report = ForecastEvaluator::new()
            .evaluate_series(&series(ForecastMetric::Cost, &data), &config)
            .unwrap();

        assert!(matches!(report.status, BacktestStatus::InsufficientData { .. }));
    }

    #[test]
    fn test_holdout_longer_than_history() {
        let data: Vec<(u32, f64)> = (0..6).map(|i| (i, 10.0 + i as f64)).collect();
        let config = EvaluationConfig::default().with_holdout(usize::MAX);
        let report = ForecastEvaluator::new()
            .evaluate_series(&series(ForecastMetric::Cost, &data), &config)
            .unwrap();

        assert!(report.is_low_confidence());
        assert_eq!(report.training_observations, 0);
        assert!(report.predictions.is_empty());
    }

    #[test]
    fn test_declining_cost_predictions_are_clamped() {
        // Trend reaches zero at sprint 8 and goes negative after
        let data: Vec<(u32, f64)> = (0..8).map(|i| (i, 800.0 - 100.0 * i as f64)).collect();
        let values: Vec<(u32, f64)> = data
            .iter()
            .copied()
            .chain([(8, 0.0), (9, 0.0), (10, 0.0)])
            .collect();
        let config = EvaluationConfig::default().with_holdout(3);
        let report = ForecastEvaluator::new()
            .evaluate_series(&series(ForecastMetric::Cost, &values), &config)
            .unwrap();

        assert_eq!(report.status, BacktestStatus::Completed);
        assert_eq!(report.predictions.len(), 3);
        for p in &report.predictions {
            assert!(p.predicted >= 0.0);
            assert_abs_diff_eq!(p.predicted, 0.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(report.mean_absolute_error.unwrap(), 0.0, epsilon = 1e-9);
        assert!(report.mean_absolute_percentage_error.is_undefined());
    }

    #[test]
    fn test_zero_actual_has_undefined_percentage_error() {
        let data = [(0, 40.0), (1, 30.0), (2, 20.0), (3, 10.0), (4, 0.0)];
        let config = EvaluationConfig::default().with_holdout(1);
        let report = ForecastEvaluator::new()
            .evaluate_series(&series(ForecastMetric::Roi, &data), &config)
            .unwrap();

        assert_eq!(report.predictions.len(), 1);
        assert!(report.predictions[0].percentage_error.is_undefined());
        assert!(report.mean_absolute_percentage_error.is_undefined());
        assert_abs_diff_eq!(report.mean_absolute_error.unwrap(), 0.0, epsilon = 1e-9);
    }
}
