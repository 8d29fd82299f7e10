//! Accuracy measures for held-out forecasts

use crate::error::{ForecastError, Result};
use sprint_math::Ratio;

fn check_lengths(forecast: &[f64], actual: &[f64]) -> Result<()> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::ValidationError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }
    Ok(())
}

/// Mean of `|actual - forecast|`
pub fn mean_absolute_error(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(forecast, actual)?;

    let total: f64 = forecast
        .iter()
        .zip(actual.iter())
        .map(|(f, a)| (a - f).abs())
        .sum();
    Ok(total / forecast.len() as f64)
}

/// `|actual - forecast| / |actual| * 100` per point; undefined where the actual is zero
pub fn percentage_errors(forecast: &[f64], actual: &[f64]) -> Result<Vec<Ratio>> {
    check_lengths(forecast, actual)?;

    Ok(forecast
        .iter()
        .zip(actual.iter())
        .map(|(f, a)| Ratio::percentage((a - f).abs(), a.abs()))
        .collect())
}

/// Mean of the defined percentage errors.
///
/// Undefined when every actual value is zero.
pub fn mean_absolute_percentage_error(forecast: &[f64], actual: &[f64]) -> Result<Ratio> {
    let errors = percentage_errors(forecast, actual)?;
    Ok(Ratio::mean_of_defined(errors))
}
