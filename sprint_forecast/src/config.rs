//! Per-call settings for forecasting and back-testing
//!
//! Nothing here is read from the environment; callers build these values (or
//! parse them from JSON) and pass them to each call.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use sprint_metrics::SeriesConfig;

/// Default number of sprints to forecast
pub const DEFAULT_HORIZON: usize = 3;
/// Default two-sided confidence level of forecast intervals
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
/// Fewest observations a forecast can be fitted on
pub const MIN_HISTORY: usize = 4;
/// Upper bound of the default back-test holdout
pub const DEFAULT_MAX_HOLDOUT: usize = 3;

/// Settings for [`ForecastEngine::forecast`](crate::ForecastEngine::forecast)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of sprints to forecast
    pub horizon: usize,
    /// Confidence level of the intervals, strictly between 0 and 1
    pub confidence_level: f64,
    /// Seasonal period in sprints; `None` disables seasonality
    pub seasonal_period: Option<usize>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            seasonal_period: None,
        }
    }
}

impl ForecastConfig {
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn with_seasonal_period(mut self, period: usize) -> Self {
        self.seasonal_period = Some(period);
        self
    }

    /// Check the settings that do not depend on the history.
    ///
    /// The horizon is checked against the history at forecast time.
    pub fn validate(&self) -> Result<()> {
        validate_confidence_level(self.confidence_level)?;
        validate_seasonal_period(self.seasonal_period)
    }
}

/// Settings for [`ForecastEvaluator::evaluate`](crate::ForecastEvaluator::evaluate)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Observations to hold out; `None` means `min(3, observations / 4)`
    pub holdout: Option<usize>,
    /// Seasonal period used by the back-tested model
    pub seasonal_period: Option<usize>,
}

impl EvaluationConfig {
    pub fn with_holdout(mut self, holdout: usize) -> Self {
        self.holdout = Some(holdout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_seasonal_period(self.seasonal_period)
    }

    /// Holdout size for a history of `observations`
    pub fn holdout_for(&self, observations: usize) -> usize {
        self.holdout
            .unwrap_or_else(|| DEFAULT_MAX_HOLDOUT.min(observations / 4))
    }
}

/// All engine settings in one document
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub series: SeriesConfig,
    pub forecast: ForecastConfig,
    pub evaluation: EvaluationConfig,
}

impl EngineConfig {
    /// Parse a JSON document; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ForecastError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.series.moving_average_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Moving average window must be at least one sprint".to_string(),
            ));
        }
        self.forecast.validate()?;
        self.evaluation.validate()
    }
}

pub(crate) fn validate_confidence_level(confidence_level: f64) -> Result<()> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Confidence level must be between 0 and 1 (exclusive), got {}",
            confidence_level
        )));
    }
    Ok(())
}

pub(crate) fn validate_seasonal_period(period: Option<usize>) -> Result<()> {
    match period {
        Some(p) if p < 2 => Err(ForecastError::InvalidParameter(format!(
            "Seasonal period must be at least 2 sprints, got {}",
            p
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.horizon, 3);
        assert_eq!(config.confidence_level, 0.95);
        assert_eq!(config.seasonal_period, None);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(f64::NAN)]
    fn test_invalid_confidence_level(#[case] level: f64) {
        let config = ForecastConfig::default().with_confidence_level(level);
        assert!(matches!(config.validate(), Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn test_invalid_seasonal_period() {
        let config = ForecastConfig::default().with_seasonal_period(1);
        assert!(config.validate().is_err());
        assert!(ForecastConfig::default().with_seasonal_period(2).validate().is_ok());
    }

    #[rstest]
    #[case(3, 0)]
    #[case(8, 2)]
    #[case(12, 3)]
    #[case(40, 3)]
    fn test_default_holdout(#[case] observations: usize, #[case] expected: usize) {
        assert_eq!(EvaluationConfig::default().holdout_for(observations), expected);
    }

    #[test]
    fn test_explicit_holdout() {
        assert_eq!(EvaluationConfig::default().with_holdout(5).holdout_for(40), 5);
    }

    #[test]
    fn test_engine_config_from_json() {
        let config = EngineConfig::from_json(
            r#"{
                "forecast": { "horizon": 5, "seasonal_period": 4 },
                "series": { "moving_average_window": 2 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.forecast.horizon, 5);
        assert_eq!(config.forecast.confidence_level, 0.95);
        assert_eq!(config.forecast.seasonal_period, Some(4));
        assert_eq!(config.series.moving_average_window, 2);
        assert_eq!(config.evaluation, EvaluationConfig::default());
    }

    #[test]
    fn test_engine_config_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(ForecastError::ConfigError(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "forecast": { "confidence_level": 1.5 } }"#),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(EngineConfig::from_json("{}").is_ok());
    }
}
