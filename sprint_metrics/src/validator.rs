//! Numeric and chronological checks on raw sprint records

use crate::error::{InvalidReason, MetricField, MetricsError, Result};
use crate::record::{SprintFinancialRecord, ValidatedRecord};
use std::collections::HashSet;

/// A stateless validator for sprint financial records.
///
/// Rejects NaN and infinite values with [`InvalidReason::NotFinite`], which is
/// reported separately from negative values.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsValidator;

impl MetricsValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate one record
    pub fn validate(&self, record: &SprintFinancialRecord) -> Result<ValidatedRecord> {
        let id = record.sprint_id.as_str();

        check_amount(id, MetricField::Cost, record.sprint_cost)?;
        check_amount(
            id,
            MetricField::EstimatedBusinessValue,
            record.estimated_business_value,
        )?;
        if let Some(actual) = record.actual_business_value {
            check_amount(id, MetricField::ActualBusinessValue, actual)?;
        }

        if record.velocity < 0 {
            return Err(MetricsError::invalid(
                id,
                MetricField::Velocity,
                InvalidReason::Negative,
            ));
        }
        let velocity = u32::try_from(record.velocity).map_err(|_| {
            MetricsError::invalid(id, MetricField::Velocity, InvalidReason::OutOfRange)
        })?;

        if record.end_date < record.start_date {
            return Err(MetricsError::invalid(
                id,
                MetricField::EndDate,
                InvalidReason::EndBeforeStart,
            ));
        }

        Ok(ValidatedRecord {
            sprint_id: record.sprint_id.clone(),
            sprint_index: record.sprint_index,
            start_date: record.start_date,
            end_date: record.end_date,
            sprint_cost: record.sprint_cost,
            estimated_business_value: record.estimated_business_value,
            velocity,
            actual_business_value: record.actual_business_value,
        })
    }

    /// Validate a batch, additionally requiring unique sprint indices.
    ///
    /// Stops at the first invalid record.
    pub fn validate_batch(
        &self,
        records: &[SprintFinancialRecord],
    ) -> Result<Vec<ValidatedRecord>> {
        let mut seen = HashSet::with_capacity(records.len());

        records
            .iter()
            .map(|record| {
                if !seen.insert(record.sprint_index) {
                    return Err(MetricsError::invalid(
                        &record.sprint_id,
                        MetricField::SprintIndex,
                        InvalidReason::DuplicateIndex,
                    ));
                }
                self.validate(record)
            })
            .collect()
    }
}

fn check_amount(sprint_id: &str, field: MetricField, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(MetricsError::invalid(sprint_id, field, InvalidReason::NotFinite));
    }
    // -0.0 compares equal to zero and is accepted
    if value < 0.0 {
        return Err(MetricsError::invalid(sprint_id, field, InvalidReason::Negative));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record() -> SprintFinancialRecord {
        SprintFinancialRecord::new("S-1", 1, date(1), date(14), 1000.0, 1500.0, 20)
    }

    fn expect_invalid(record: &SprintFinancialRecord) -> (MetricField, InvalidReason) {
        match MetricsValidator.validate(record) {
            Err(MetricsError::InvalidMetric { field, reason, .. }) => (field, reason),
            other => panic!("Expected InvalidMetric, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_record() {
        let validated = MetricsValidator::new().validate(&record()).unwrap();
        assert_eq!(validated.velocity, 20);
        assert_eq!(validated.sprint_cost, 1000.0);
    }

    #[test]
    fn test_zero_amounts_are_valid() {
        let mut r = record();
        r.sprint_cost = 0.0;
        r.estimated_business_value = 0.0;
        r.velocity = 0;
        assert!(MetricsValidator.validate(&r).is_ok());
    }

    #[test]
    fn test_single_day_sprint_is_valid() {
        let mut r = record();
        r.end_date = r.start_date;
        assert!(MetricsValidator.validate(&r).is_ok());
    }

    #[rstest]
    #[case(-1.0, InvalidReason::Negative)]
    #[case(f64::NAN, InvalidReason::NotFinite)]
    #[case(f64::INFINITY, InvalidReason::NotFinite)]
    #[case(f64::NEG_INFINITY, InvalidReason::NotFinite)]
    fn test_bad_cost(#[case] cost: f64, #[case] reason: InvalidReason) {
        let mut r = record();
        r.sprint_cost = cost;
        assert_eq!(expect_invalid(&r), (MetricField::Cost, reason));
    }

    #[test]
    fn test_bad_estimated_value() {
        let mut r = record();
        r.estimated_business_value = -0.01;
        assert_eq!(
            expect_invalid(&r),
            (MetricField::EstimatedBusinessValue, InvalidReason::Negative)
        );
    }

    #[test]
    fn test_bad_actual_value() {
        let r = record().with_actual_value(f64::NAN);
        assert_eq!(
            expect_invalid(&r),
            (MetricField::ActualBusinessValue, InvalidReason::NotFinite)
        );
    }

    #[rstest]
    #[case(-3, InvalidReason::Negative)]
    #[case(i64::from(u32::MAX) + 1, InvalidReason::OutOfRange)]
    fn test_bad_velocity(#[case] velocity: i64, #[case] reason: InvalidReason) {
        let mut r = record();
        r.velocity = velocity;
        assert_eq!(expect_invalid(&r), (MetricField::Velocity, reason));
    }

    #[test]
    fn test_end_before_start() {
        let mut r = record();
        r.end_date = date(1);
        r.start_date = date(2);
        assert_eq!(
            expect_invalid(&r),
            (MetricField::EndDate, InvalidReason::EndBeforeStart)
        );
    }

    #[test]
    fn test_batch_rejects_duplicate_index() {
        let first = record();
        let mut second = record();
        second.sprint_id = "S-1b".to_string();

        let err = MetricsValidator.validate_batch(&[first, second]).unwrap_err();
        match err {
            MetricsError::InvalidMetric {
                sprint_id,
                field,
                reason,
            } => {
                assert_eq!(sprint_id, "S-1b");
                assert_eq!(field, MetricField::SprintIndex);
                assert_eq!(reason, InvalidReason::DuplicateIndex);
            }
            other => panic!("Expected InvalidMetric, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_accepts_gaps() {
        let mut later = record();
        later.sprint_index = 4;
        let validated = MetricsValidator.validate_batch(&[record(), later]).unwrap();
        assert_eq!(validated.len(), 2);
    }
}
