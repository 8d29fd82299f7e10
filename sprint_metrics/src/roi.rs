//! Return-on-investment calculations for a single sprint

use serde::Serialize;
use sprint_math::Ratio;

/// ROI above this percentage counts as a high-return sprint
pub const HIGH_ROI_THRESHOLD: f64 = 50.0;

/// Decimal places of ROI percentages in serialized output
pub const ROI_DECIMAL_PLACES: u32 = 4;

/// A stateless calculator for per-sprint ROI.
///
/// ROI is `((value - cost) / cost) * 100`. A zero cost yields
/// [`Ratio::Undefined`], which is neither zero nor an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoiCalculator;

/// Estimated and, once known, realized ROI of a sprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoiBreakdown {
    /// ROI from the estimated business value
    pub roi: Ratio,
    /// ROI from the actual business value, for completed sprints
    pub realized_roi: Option<Ratio>,
    /// `realized_roi - roi`; positive means the estimate was too pessimistic
    pub variance: Option<Ratio>,
}

impl RoiCalculator {
    pub fn new() -> Self {
        Self
    }

    /// ROI percentage of `value` against `cost`
    pub fn roi(&self, cost: f64, value: f64) -> Ratio {
        Ratio::percentage(value - cost, cost)
    }

    /// Full breakdown, including realized ROI and variance when `actual_value` is present
    pub fn calculate(
        &self,
        cost: f64,
        estimated_value: f64,
        actual_value: Option<f64>,
    ) -> RoiBreakdown {
        let roi = self.roi(cost, estimated_value);
        let realized_roi = actual_value.map(|actual| self.roi(cost, actual));
        let variance = realized_roi.map(|realized| realized.difference(roi));

        RoiBreakdown {
            roi,
            realized_roi,
            variance,
        }
    }
}

/// Coarse performance classification of a sprint's ROI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiBand {
    /// More than 50% return
    Strong,
    /// Positive return up to 50%
    Positive,
    /// Break-even or loss
    Loss,
    /// Cost was zero
    Undefined,
}

impl RoiBand {
    pub fn classify(roi: Ratio) -> Self {
        match roi {
            Ratio::Value(v) if v > HIGH_ROI_THRESHOLD => RoiBand::Strong,
            Ratio::Value(v) if v > 0.0 => RoiBand::Positive,
            Ratio::Value(_) => RoiBand::Loss,
            Ratio::Undefined => RoiBand::Undefined,
        }
    }
}
