//! Confidence intervals for forecasts

use crate::config::validate_confidence_level;
use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard normal critical value for `confidence_level`
pub fn z_score(confidence_level: f64) -> Result<f64> {
    validate_confidence_level(confidence_level)?;

    let normal = Normal::new(0.0, 1.0).map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
    Ok(normal.inverse_cdf((1.0 + confidence_level) / 2.0))
}

/// Symmetric interval around `point` for forecast step `step` (1-based).
///
/// The half-width grows with the square root of the step.
pub fn interval(point: f64, residual_std_dev: f64, z: f64, step: usize) -> (f64, f64) {
    let margin = z * residual_std_dev * (step as f64).sqrt();
    (point - margin, point + margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.80, 1.2816)]
    #[case(0.90, 1.6449)]
    #[case(0.95, 1.9600)]
    #[case(0.99, 2.5758)]
    fn test_z_scores(#[case] level: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(z_score(level).unwrap(), expected, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_level() {
        assert!(z_score(1.0).is_err());
        assert!(z_score(0.0).is_err());
    }

    #[test]
    fn test_interval_widens_with_step() {
        let (l1, u1) = interval(100.0, 10.0, 2.0, 1);
        let (l4, u4) = interval(100.0, 10.0, 2.0, 4);

        assert_abs_diff_eq!(l1, 80.0);
        assert_abs_diff_eq!(u1, 120.0);
        assert_abs_diff_eq!(l4, 60.0);
        assert_abs_diff_eq!(u4, 140.0);
    }

    #[test]
    fn test_zero_deviation_collapses_to_point() {
        assert_eq!(interval(42.0, 0.0, 1.96, 3), (42.0, 42.0));
    }
}
