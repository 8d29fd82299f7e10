//! Sprint financial records and the metrics derived from them

use crate::roi::{RoiBand, RoiBreakdown, RoiCalculator, ROI_DECIMAL_PLACES};
use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use sprint_math::Ratio;

/// Raw financial inputs for one sprint, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintFinancialRecord {
    /// Caller-side sprint identifier
    pub sprint_id: String,
    /// Chronological position of the sprint within its project
    pub sprint_index: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sprint_cost: f64,
    pub estimated_business_value: f64,
    /// Completed story points; signed so that bad input can be reported
    pub velocity: i64,
    /// Only present once the sprint is complete
    #[serde(default)]
    pub actual_business_value: Option<f64>,
}

impl SprintFinancialRecord {
    /// Create a record without an actual business value
    pub fn new(
        sprint_id: impl Into<String>,
        sprint_index: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        sprint_cost: f64,
        estimated_business_value: f64,
        velocity: i64,
    ) -> Self {
        Self {
            sprint_id: sprint_id.into(),
            sprint_index,
            start_date,
            end_date,
            sprint_cost,
            estimated_business_value,
            velocity,
            actual_business_value: None,
        }
    }

    /// Attach the business value realised by a completed sprint
    pub fn with_actual_value(mut self, actual_business_value: f64) -> Self {
        self.actual_business_value = Some(actual_business_value);
        self
    }
}

/// A record that passed validation.
///
/// Only [`MetricsValidator`](crate::MetricsValidator) can build one, so every
/// numeric field is known to be finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    pub(crate) sprint_id: String,
    pub(crate) sprint_index: u32,
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
    pub(crate) sprint_cost: f64,
    pub(crate) estimated_business_value: f64,
    pub(crate) velocity: u32,
    pub(crate) actual_business_value: Option<f64>,
}

/// Derived metrics for one validated sprint.
///
/// ROI is not stored: every accessor recomputes it from cost and value.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintMetrics {
    record: ValidatedRecord,
}

impl SprintMetrics {
    pub fn new(record: ValidatedRecord) -> Self {
        Self { record }
    }

    pub fn sprint_id(&self) -> &str {
        &self.record.sprint_id
    }

    pub fn sprint_index(&self) -> u32 {
        self.record.sprint_index
    }

    pub fn start_date(&self) -> NaiveDate {
        self.record.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.record.end_date
    }

    /// Length of the sprint in days, counting both start and end dates
    pub fn duration_days(&self) -> i64 {
        (self.record.end_date - self.record.start_date).num_days() + 1
    }

    pub fn sprint_cost(&self) -> f64 {
        self.record.sprint_cost
    }

    pub fn estimated_business_value(&self) -> f64 {
        self.record.estimated_business_value
    }

    pub fn velocity(&self) -> u32 {
        self.record.velocity
    }

    pub fn actual_business_value(&self) -> Option<f64> {
        self.record.actual_business_value
    }

    pub fn is_completed(&self) -> bool {
        self.record.actual_business_value.is_some()
    }

    /// ROI from estimated value, as a percentage
    pub fn roi(&self) -> Ratio {
        RoiCalculator.roi(self.record.sprint_cost, self.record.estimated_business_value)
    }

    /// Estimated ROI plus realized ROI and variance when the actual value is known
    pub fn roi_breakdown(&self) -> RoiBreakdown {
        RoiCalculator.calculate(
            self.record.sprint_cost,
            self.record.estimated_business_value,
            self.record.actual_business_value,
        )
    }

    pub fn roi_band(&self) -> RoiBand {
        RoiBand::classify(self.roi())
    }

    /// Human-readable ROI, e.g. `50.00%` or `N/A (cost is zero)`
    pub fn roi_label(&self) -> String {
        match self.roi() {
            Ratio::Undefined => "N/A (cost is zero)".to_string(),
            defined => defined.to_string(),
        }
    }
}

/// ROI fields are rounded to [`ROI_DECIMAL_PLACES`]; accessors keep full precision
impl Serialize for SprintMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let breakdown = self.roi_breakdown();
        let round = |r: Ratio| r.rounded(ROI_DECIMAL_PLACES);
        let mut state = serializer.serialize_struct("SprintMetrics", 11)?;
        state.serialize_field("sprint_id", self.sprint_id())?;
        state.serialize_field("sprint_index", &self.sprint_index())?;
        state.serialize_field("start_date", &self.start_date())?;
        state.serialize_field("end_date", &self.end_date())?;
        state.serialize_field("sprint_cost", &self.sprint_cost())?;
        state.serialize_field("estimated_business_value", &self.estimated_business_value())?;
        state.serialize_field("velocity", &self.velocity())?;
        state.serialize_field("actual_business_value", &self.actual_business_value())?;
        state.serialize_field("roi", &round(breakdown.roi))?;
        state.serialize_field("realized_roi", &breakdown.realized_roi.map(round))?;
        state.serialize_field("roi_variance", &breakdown.variance.map(round))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::MetricsValidator;

    fn metrics(cost: f64, value: f64, actual: Option<f64>) -> SprintMetrics {
        let start = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 19).unwrap();
        let mut record = SprintFinancialRecord::new("S-7", 7, start, end, cost, value, 18);
        if let Some(actual) = actual {
            record = record.with_actual_value(actual);
        }
        SprintMetrics::new(MetricsValidator.validate(&record).unwrap())
    }

    #[test]
    fn test_serialized_roi_is_rounded() {
        let sprint = metrics(987.65, 1234.56, Some(1000.0));
        let json = serde_json::to_value(&sprint).unwrap();

        assert_eq!(json["roi"]["value"], 24.9997);
        assert_eq!(json["realized_roi"]["value"], 1.2504);
        assert!(sprint.roi().value().unwrap() > 24.99974);
    }

    #[test]
    fn test_serialized_undefined_roi_is_kept() {
        let json = serde_json::to_value(metrics(0.0, 10.0, None)).unwrap();

        assert_eq!(json["roi"]["state"], "undefined");
        assert!(json["realized_roi"].is_null());
    }

    #[test]
    fn test_completion_and_duration() {
        assert!(metrics(100.0, 120.0, Some(130.0)).is_completed());
        assert!(!metrics(100.0, 120.0, None).is_completed());
        assert_eq!(metrics(100.0, 120.0, None).duration_days(), 14);
    }
}
