//! Descriptive statistics over slices of values

use crate::{MathError, Result};

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; the mean of the two middle values for even-length input
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot calculate median of an empty series".to_string(),
        ));
    }

    if values.iter().any(|v| v.is_nan()) {
        return Err(MathError::InvalidInput(
            "Cannot calculate median of a series containing NaN".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// `ddof = 0` gives the population deviation, `ddof = 1` the sample deviation.
pub fn std_dev(values: &[f64], ddof: usize) -> Result<f64> {
    if values.len() <= ddof {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} values for standard deviation, have {}",
            ddof,
            values.len()
        )));
    }

    let avg = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>();

    Ok((sum_sq / (values.len() - ddof) as f64).sqrt())
}

/// Running totals: element `i` is the sum of `values[..=i]`
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |total, v| {
            *total += v;
            Some(*total)
        })
        .collect()
}
