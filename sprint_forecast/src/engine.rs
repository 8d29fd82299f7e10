//! Multi-step forecasts with confidence intervals

use crate::confidence::{interval, z_score};
use crate::config::{ForecastConfig, MIN_HISTORY};
use crate::data::{ForecastMetric, MetricSeries};
use crate::decomposition::SeasonalComponent;
use crate::error::{ForecastError, Result};
use crate::models::{DecomposedTrend, ForecastModel, TrainedForecastModel, TrendComponent};
use serde::Serialize;
use sprint_metrics::{ProjectFinancialSeries, SeriesWarning};
use tracing::debug;

/// One forecast step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Steps ahead of the last sprint, starting at 1
    pub step: usize,
    pub sprint_index: u32,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ForecastPoint {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Forecast for one metric together with the fitted components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    metric: ForecastMetric,
    model: String,
    confidence_level: f64,
    points: Vec<ForecastPoint>,
    trend: TrendComponent,
    seasonal: Option<SeasonalComponent>,
    residual_std_dev: f64,
    /// Observations the model was fitted on
    observations: usize,
    /// Sprints without an observation, skipped when fitting
    missing_indices: Vec<u32>,
    warnings: Vec<SeriesWarning>,
}

impl Forecast {
    pub fn metric(&self) -> ForecastMetric {
        self.metric
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    /// Point forecasts in step order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn trend(&self) -> &TrendComponent {
        &self.trend
    }

    pub fn seasonal(&self) -> Option<&SeasonalComponent> {
        self.seasonal.as_ref()
    }

    pub fn residual_std_dev(&self) -> f64 {
        self.residual_std_dev
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn missing_indices(&self) -> &[u32] {
        &self.missing_indices
    }

    pub fn warnings(&self) -> &[SeriesWarning] {
        &self.warnings
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Stateless forecaster; every call fits its own model
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn new() -> Self {
        Self
    }

    /// Forecast `metric` for the sprints after the last one in `series`
    pub fn forecast(
        &self,
        series: &ProjectFinancialSeries,
        metric: ForecastMetric,
        config: &ForecastConfig,
    ) -> Result<Forecast> {
        let data = MetricSeries::from_series(series, metric);
        self.forecast_series(&data, config)
    }

    /// Forecast an already extracted metric series
    pub fn forecast_series(
        &self,
        data: &MetricSeries,
        config: &ForecastConfig,
    ) -> Result<Forecast> {
        config.validate()?;

        let available = data.len();
        if config.horizon == 0 {
            return Err(ForecastError::InvalidHorizon {
                horizon: config.horizon,
                available,
            });
        }
        if available < MIN_HISTORY {
            return Err(ForecastError::InsufficientHistory {
                required: MIN_HISTORY,
                available,
            });
        }
        let last_target = u32::try_from(config.horizon)
            .ok()
            .and_then(|h| data.last_sprint_index().checked_add(h));
        if config.horizon > available || last_target.is_none() {
            return Err(ForecastError::InvalidHorizon {
                horizon: config.horizon,
                available,
            });
        }

        let model = DecomposedTrend::new(config.seasonal_period)?;
        let trained = model.train(data)?;
        let z = z_score(config.confidence_level)?;
        let sigma = trained.residual_std_dev();
        let clamp = data.metric().is_non_negative();

        let points = (1..=config.horizon)
            .map(|step| {
                // Bounded by the last target checked above
                let sprint_index = data.last_sprint_index() + step as u32;
                let value = trained.predict(sprint_index);
                let (lower, upper) = interval(value, sigma, z, step);
                if clamp {
                    ForecastPoint {
                        step,
                        sprint_index,
                        value: value.max(0.0),
                        lower: lower.max(0.0),
                        upper: upper.max(0.0),
                    }
                } else {
                    ForecastPoint {
                        step,
                        sprint_index,
                        value,
                        lower,
                        upper,
                    }
                }
            })
            .collect::<Vec<_>>();

        debug!(
            metric = %data.metric(),
            horizon = config.horizon,
            observations = available,
            residual_std_dev = sigma,
            "Generated forecast"
        );

        Ok(Forecast {
            metric: data.metric(),
            model: trained.name().to_string(),
            confidence_level: config.confidence_level,
            points,
            trend: trained.trend(),
            seasonal: trained.seasonal().cloned(),
            residual_std_dev: sigma,
            observations: available,
            missing_indices: data.missing_indices(),
            warnings: data.warnings().to_vec(),
        })
    }
}
