//! Utility functions for building sprint histories
//!
//! Used by tests, benchmarks and demos that need realistic sprint records.

use crate::record::SprintFinancialRecord;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of a generated sprint in days
pub const SPRINT_LENGTH_DAYS: i64 = 14;

fn sprint_dates(first_start: NaiveDate, index: u32) -> (NaiveDate, NaiveDate) {
    let start = first_start + Duration::days(SPRINT_LENGTH_DAYS * i64::from(index));
    (start, start + Duration::days(SPRINT_LENGTH_DAYS - 1))
}

/// Build one record per `(index, cost, value)` triple with back-to-back
/// two-week sprints starting on `first_start` for index 0.
pub fn records_from_values(
    first_start: NaiveDate,
    values: &[(u32, f64, f64)],
) -> Vec<SprintFinancialRecord> {
    values
        .iter()
        .map(|&(index, cost, value)| {
            let (start, end) = sprint_dates(first_start, index);
            let id = format!("sprint-{}", index);
            SprintFinancialRecord::new(id, index, start, end, cost, value, 20)
        })
        .collect()
}

/// Generate a noisy sprint history for testing purposes
///
/// # Arguments
/// * `num_sprints` - Number of sprints, indexed from 0
/// * `starting_cost` - Cost of the first sprint
/// * `cost_growth` - Cost added per sprint
/// * `roi_target` - Mean ROI percentage the estimated values are drawn around
/// * `noise` - Relative noise factor (0.0-1.0) applied to cost and value
/// * `seed` - Seed for reproducible output
///
/// # Returns
/// * Vector of records; the first half carry an actual business value
pub fn generate_test_records(
    num_sprints: usize,
    starting_cost: f64,
    cost_growth: f64,
    roi_target: f64,
    noise: f64,
    seed: u64,
) -> Vec<SprintFinancialRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let first_start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN);
    let noise = noise.clamp(0.0, 1.0);

    (0..num_sprints)
        .map(|i| {
            let index = i as u32;
            let (start, end) = sprint_dates(first_start, index);

            let base_cost = starting_cost + cost_growth * i as f64;
            let cost = (base_cost * (1.0 + noise * rng.gen_range(-1.0..=1.0))).max(0.0);
            let jitter = 1.0 + noise * rng.gen_range(-1.0..=1.0);
            let value = (cost * (1.0 + roi_target / 100.0) * jitter).max(0.0);
            let velocity = rng.gen_range(15..=40);

            let record = SprintFinancialRecord::new(
                format!("sprint-{}", index),
                index,
                start,
                end,
                cost,
                value,
                velocity,
            );

            if i < num_sprints / 2 {
                let actual = (value * (1.0 + noise * rng.gen_range(-1.0..=1.0))).max(0.0);
                record.with_actual_value(actual)
            } else {
                record
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::MetricsValidator;

    #[test]
    fn test_generated_records_are_valid() {
        let records = generate_test_records(12, 1000.0, 50.0, 40.0, 0.2, 7);
        assert_eq!(records.len(), 12);
        assert!(MetricsValidator.validate_batch(&records).is_ok());
        assert!(records[0].actual_business_value.is_some());
        assert!(records[11].actual_business_value.is_none());
    }

    #[test]
    fn test_generation_is_reproducible() {
        let a = generate_test_records(5, 1000.0, 0.0, 20.0, 0.3, 42);
        let b = generate_test_records(5, 1000.0, 0.0, 20.0, 0.3, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_records_from_values() {
        let day0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = records_from_values(day0, &[(0, 100.0, 150.0), (2, 120.0, 150.0)]);

        assert_eq!(records[1].sprint_index, 2);
        assert_eq!(records[1].start_date, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
        assert_eq!(records[1].end_date, NaiveDate::from_ymd_opt(2024, 2, 11).unwrap());
    }
}
