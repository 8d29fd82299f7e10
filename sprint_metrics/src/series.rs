//! Project-level series of sprint metrics

use crate::record::SprintMetrics;
use crate::roi::HIGH_ROI_THRESHOLD;
use serde::Serialize;
use sprint_math::Ratio;
use std::fmt;

/// A non-fatal data quality issue found while building a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesWarning {
    /// Sprint indices jump from `after` to `next`; the sprints in between are missing
    IndexGap { after: u32, next: u32 },
}

impl SeriesWarning {
    /// Sprint indices this warning reports as missing
    pub fn missing_indices(&self) -> std::ops::Range<u32> {
        match *self {
            SeriesWarning::IndexGap { after, next } => after + 1..next,
        }
    }
}

impl fmt::Display for SeriesWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesWarning::IndexGap { after, next } => write!(
                f,
                "sprint index gap: {} missing sprint(s) between {} and {}",
                next - after - 1,
                after,
                next
            ),
        }
    }
}

/// Summary statistics over a project's sprint history.
///
/// ROI means only count sprints whose ROI is defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub sprint_count: usize,
    pub total_cost: f64,
    pub mean_cost: f64,
    pub median_cost: f64,
    pub mean_velocity: f64,
    pub mean_roi: Ratio,
    /// Over completed sprints only
    pub mean_realized_roi: Ratio,
    /// Mean of `realized - estimated` ROI over completed sprints
    pub mean_roi_variance: Ratio,
    /// Sum of estimated business value
    pub cumulative_business_value: f64,
    /// Sum of actual business value over completed sprints
    pub cumulative_actual_value: f64,
}

/// An ordered, duplicate-free sequence of sprint metrics for one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectFinancialSeries {
    pub(crate) sprints: Vec<SprintMetrics>,
    pub(crate) summary: SeriesSummary,
    pub(crate) moving_average_window: usize,
    /// Aligned with `sprints`
    pub(crate) moving_average_roi: Vec<Ratio>,
    /// Running total of estimated business value, aligned with `sprints`
    pub(crate) cumulative_business_value: Vec<f64>,
    pub(crate) warnings: Vec<SeriesWarning>,
}

impl ProjectFinancialSeries {
    /// Sprints ordered by sprint index
    pub fn sprints(&self) -> &[SprintMetrics] {
        &self.sprints
    }

    pub fn summary(&self) -> &SeriesSummary {
        &self.summary
    }

    pub fn warnings(&self) -> &[SeriesWarning] {
        &self.warnings
    }

    pub fn sprint_count(&self) -> usize {
        self.sprints.len()
    }

    pub fn has_gaps(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Every sprint index missing between the first and last sprint
    pub fn missing_indices(&self) -> Vec<u32> {
        self.warnings.iter().flat_map(|w| w.missing_indices()).collect()
    }

    pub fn first_index(&self) -> u32 {
        self.sprints.first().map_or(0, SprintMetrics::sprint_index)
    }

    pub fn last_index(&self) -> u32 {
        self.sprints.last().map_or(0, SprintMetrics::sprint_index)
    }

    pub fn get(&self, sprint_index: u32) -> Option<&SprintMetrics> {
        self.sprints
            .binary_search_by_key(&sprint_index, SprintMetrics::sprint_index)
            .ok()
            .map(|pos| &self.sprints[pos])
    }

    pub fn cost_series(&self) -> Vec<(u32, f64)> {
        self.sprints
            .iter()
            .map(|s| (s.sprint_index(), s.sprint_cost()))
            .collect()
    }

    pub fn estimated_value_series(&self) -> Vec<(u32, f64)> {
        self.sprints
            .iter()
            .map(|s| (s.sprint_index(), s.estimated_business_value()))
            .collect()
    }

    pub fn roi_series(&self) -> Vec<(u32, Ratio)> {
        self.sprints.iter().map(|s| (s.sprint_index(), s.roi())).collect()
    }

    pub fn moving_average_window(&self) -> usize {
        self.moving_average_window
    }

    /// Trailing moving average of ROI, aligned with [`sprints`](Self::sprints)
    pub fn moving_average_roi(&self) -> &[Ratio] {
        &self.moving_average_roi
    }

    /// Running total of estimated business value, aligned with [`sprints`](Self::sprints)
    pub fn cumulative_business_value(&self) -> &[f64] {
        &self.cumulative_business_value
    }

    /// Sprints whose ROI is defined and above `threshold` percent
    pub fn high_roi_sprints(&self, threshold: f64) -> Vec<&SprintMetrics> {
        self.sprints
            .iter()
            .filter(|s| matches!(s.roi(), Ratio::Value(v) if v > threshold))
            .collect()
    }

    /// Sprints above [`HIGH_ROI_THRESHOLD`]
    pub fn default_high_roi_sprints(&self) -> Vec<&SprintMetrics> {
        self.high_roi_sprints(HIGH_ROI_THRESHOLD)
    }

    /// Serialize the series, including computed ROI, to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
