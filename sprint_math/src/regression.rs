//! Ordinary least-squares linear regression
//!
//! Fits `y = intercept + slope * x` to arbitrary `(x, y)` points. The x values
//! do not have to be evenly spaced, so series with missing positions can be
//! fitted on the positions that were actually observed.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// A fitted least-squares line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    n_observations: usize,
    /// Coefficient of determination; `None` when y has no variance
    r_squared: Option<f64>,
}

impl LinearRegression {
    /// Fit a line to `points`.
    ///
    /// Needs at least two points with distinct x values.
    pub fn fit(points: &[(f64, f64)]) -> Result<Self> {
        if points.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for linear regression. Need at least 2 points.".to_string(),
            ));
        }

        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(MathError::InvalidInput(
                "Regression points must be finite".to_string(),
            ));
        }

        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for &(x, y) in points {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let ss_total: f64 = points.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();
        let ss_residual: f64 = points
            .iter()
            .map(|&(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();

        let r_squared = if ss_total.abs() < 1e-10 {
            None
        } else {
            Some(1.0 - ss_residual / ss_total)
        };

        Ok(Self {
            slope,
            intercept,
            n_observations: points.len(),
            r_squared,
        })
    }

    /// Value of the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Observed minus fitted, in the order of `points`
    pub fn residuals(&self, points: &[(f64, f64)]) -> Vec<f64> {
        points.iter().map(|&(x, y)| y - self.predict(x)).collect()
    }

    /// Standard error of the regression, `sqrt(SSR / (n - 2))`.
    pub fn residual_std_error(&self, points: &[(f64, f64)]) -> Result<f64> {
        if points.len() <= 2 {
            return Err(MathError::InsufficientData(
                "Need more than 2 points to estimate residual deviation".to_string(),
            ));
        }

        let ssr: f64 = self.residuals(points).iter().map(|r| r * r).sum();
        Ok((ssr / (points.len() - 2) as f64).sqrt())
    }

    /// Trend direction and strength per unit of x
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_perfect_line() {
        let points: Vec<(f64, f64)> =
            (0..10).map(|i| (i as f64, 100.0 + 10.0 * i as f64)).collect();
        let model = LinearRegression::fit(&points).unwrap();

        assert_relative_eq!(model.slope(), 10.0, epsilon = 1e-10);
        assert_relative_eq!(model.intercept(), 100.0, epsilon = 1e-10);
        assert_relative_eq!(model.predict(10.0), 200.0, epsilon = 1e-9);
        assert_relative_eq!(model.r_squared().unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(model.residual_std_error(&points).unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(model.n_observations(), 10);
    }

    #[test]
    fn test_uneven_spacing() {
        // The point at x = 3 is missing
        let points = vec![(1.0, 3.0), (2.0, 5.0), (4.0, 9.0), (5.0, 11.0)];
        let model = LinearRegression::fit(&points).unwrap();

        assert_relative_eq!(model.slope(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(model.predict(3.0), 7.0, epsilon = 1e-10);
    }

    #[test]
    fn test_flat_series_has_no_r_squared() {
        let points = vec![(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)];
        let model = LinearRegression::fit(&points).unwrap();

        assert_abs_diff_eq!(model.slope(), 0.0);
        assert_eq!(model.r_squared(), None);
    }

    #[test]
    fn test_residuals() {
        let points = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 4.0)];
        let model = LinearRegression::fit(&points).unwrap();
        let residuals = model.residuals(&points);

        assert_eq!(residuals.len(), 4);
        assert_abs_diff_eq!(residuals.iter().sum::<f64>(), 0.0, epsilon = 1e-10);
        assert!(model.residual_std_error(&points).unwrap() > 0.0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(LinearRegression::fit(&[(0.0, 1.0)]).is_err());
        assert!(LinearRegression::fit(&[(1.0, 1.0), (1.0, 2.0)]).is_err());
        assert!(LinearRegression::fit(&[(0.0, f64::NAN), (1.0, 2.0)]).is_err());
    }
}
