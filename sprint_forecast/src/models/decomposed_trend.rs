//! Linear trend plus optional additive seasonality

use crate::config::{validate_seasonal_period, MIN_HISTORY};
use crate::data::{MetricSeries, Observation};
use crate::decomposition::{seasonal_component, SeasonalComponent};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use serde::{Deserialize, Serialize};
use sprint_math::LinearRegression;
use tracing::debug;

/// Fitted trend line over sprint index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendComponent {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: Option<f64>,
    /// Trend value at each observed sprint
    pub fitted: Vec<Observation>,
}

impl TrendComponent {
    pub fn value_at(&self, sprint_index: u32) -> f64 {
        self.intercept + self.slope * f64::from(sprint_index)
    }
}

/// Least-squares trend over the deseasonalised series
#[derive(Debug, Clone)]
pub struct DecomposedTrend {
    /// Name of the model
    name: String,
    /// Seasonal period, if seasonality is enabled
    seasonal_period: Option<usize>,
}

/// Trained [`DecomposedTrend`] model
#[derive(Debug, Clone)]
pub struct TrainedDecomposedTrend {
    name: String,
    regression: LinearRegression,
    seasonal: Option<SeasonalComponent>,
    fitted: Vec<Observation>,
    residual_std_dev: f64,
}

impl DecomposedTrend {
    /// Create a new model; `seasonal_period` must be at least 2 when present
    pub fn new(seasonal_period: Option<usize>) -> Result<Self> {
        validate_seasonal_period(seasonal_period)?;

        let name = match seasonal_period {
            Some(p) => format!("Decomposed Trend (seasonal period={})", p),
            None => "Decomposed Trend".to_string(),
        };

        Ok(Self {
            name,
            seasonal_period,
        })
    }

    pub fn seasonal_period(&self) -> Option<usize> {
        self.seasonal_period
    }
}

impl ForecastModel for DecomposedTrend {
    type Trained = TrainedDecomposedTrend;

    fn train(&self, data: &MetricSeries) -> Result<Self::Trained> {
        if data.len() < MIN_HISTORY {
            return Err(ForecastError::InsufficientHistory {
                required: MIN_HISTORY,
                available: data.len(),
            });
        }

        let observations = data.observations();
        let seasonal = match self.seasonal_period {
            Some(period) => seasonal_component(observations, period)?,
            None => None,
        };

        let adjusted: Vec<(f64, f64)> = match &seasonal {
            Some(s) => observations
                .iter()
                .map(|o| (f64::from(o.sprint_index), o.value - s.factor_for(o.sprint_index)))
                .collect(),
            None => data.points(),
        };

        let regression = LinearRegression::fit(&adjusted)?;
        let residual_std_dev = regression.residual_std_error(&adjusted)?;

        let fitted = observations
            .iter()
            .map(|o| {
                let value = regression.predict(f64::from(o.sprint_index));
                Observation::new(o.sprint_index, value)
            })
            .collect();

        debug!(
            model = %self.name,
            metric = %data.metric(),
            observations = data.len(),
            slope = regression.slope(),
            residual_std_dev,
            seasonal = seasonal.is_some(),
            "Fitted forecast model"
        );

        Ok(TrainedDecomposedTrend {
            name: self.name.clone(),
            regression,
            seasonal,
            fitted,
            residual_std_dev,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedDecomposedTrend {
    pub fn trend(&self) -> TrendComponent {
        TrendComponent {
            slope: self.regression.slope(),
            intercept: self.regression.intercept(),
            r_squared: self.regression.r_squared(),
            fitted: self.fitted.clone(),
        }
    }

    /// Seasonal component, if seasonality was enabled and detected
    pub fn seasonal(&self) -> Option<&SeasonalComponent> {
        self.seasonal.as_ref()
    }
}

impl TrainedForecastModel for TrainedDecomposedTrend {
    fn predict(&self, sprint_index: u32) -> f64 {
        let trend = self.regression.predict(f64::from(sprint_index));
        let season = self.seasonal.as_ref().map_or(0.0, |s| s.factor_for(sprint_index));
        trend + season
    }

    fn residual_std_dev(&self) -> f64 {
        self.residual_std_dev
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ForecastMetric;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn series(values: &[(u32, f64)]) -> MetricSeries {
        MetricSeries::from_observations(
            ForecastMetric::Cost,
            values.iter().map(|&(i, v)| Observation::new(i, v)).collect(),
        )
    }

    #[test]
    fn test_linear_fit() {
        let data: Vec<(u32, f64)> = (0..10).map(|i| (i, 100.0 + 10.0 * i as f64)).collect();
        let trained = DecomposedTrend::new(None).unwrap().train(&series(&data)).unwrap();

        assert_relative_eq!(trained.predict(10), 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(trained.residual_std_dev(), 0.0, epsilon = 1e-9);
        assert!(trained.seasonal().is_none());
        assert_eq!(trained.trend().fitted.len(), 10);
        assert_eq!(trained.name(), "Decomposed Trend");
    }

    #[test]
    fn test_requires_minimum_history() {
        let data = [(0, 1.0), (1, 2.0), (2, 3.0)];
        let err = DecomposedTrend::new(None).unwrap().train(&series(&data)).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientHistory {
                required: 4,
                available: 3
            }
        );
    }

    #[test]
    fn test_seasonal_fit_is_exact() {
        let data: Vec<(u32, f64)> = (0..12)
            .map(|i| (i, 500.0 + 5.0 * i as f64 + if i % 2 == 0 { 40.0 } else { -40.0 }))
            .collect();
        let model = DecomposedTrend::new(Some(2)).unwrap();
        let trained = model.train(&series(&data)).unwrap();

        assert!(trained.seasonal().is_some());
        assert_relative_eq!(trained.trend().slope, 5.0, epsilon = 1e-9);
        assert_relative_eq!(trained.predict(12), 500.0 + 60.0 + 40.0, epsilon = 1e-8);
        assert_relative_eq!(trained.predict(13), 500.0 + 65.0 - 40.0, epsilon = 1e-8);
        assert_abs_diff_eq!(trained.residual_std_dev(), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_period() {
        assert!(DecomposedTrend::new(Some(1)).is_err());
        assert_eq!(DecomposedTrend::new(Some(4)).unwrap().seasonal_period(), Some(4));
    }
}
