//! Roll-up of per-sprint metrics into a project series

use crate::error::{InvalidReason, MetricField, MetricsError, Result};
use crate::record::SprintMetrics;
use crate::series::{ProjectFinancialSeries, SeriesSummary, SeriesWarning};
use serde::{Deserialize, Serialize};
use sprint_math::moving_averages::trailing_mean;
use sprint_math::{statistics, Ratio};
use tracing::{debug, warn};

/// Default number of sprints in the ROI moving average
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 3;

/// Settings for building a project series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Window, in sprints, of the trailing ROI moving average
    pub moving_average_window: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
        }
    }
}

/// Builds [`ProjectFinancialSeries`] from validated sprint metrics
#[derive(Debug, Clone)]
pub struct HistoryAggregator {
    window: usize,
}

impl Default for HistoryAggregator {
    fn default() -> Self {
        Self {
            window: DEFAULT_MOVING_AVERAGE_WINDOW,
        }
    }
}

impl HistoryAggregator {
    /// Create an aggregator with the given moving-average window
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(MetricsError::InvalidParameter(
                "Moving average window must be at least one sprint".to_string(),
            ));
        }
        Ok(Self { window })
    }

    pub fn from_config(config: &SeriesConfig) -> Result<Self> {
        Self::new(config.moving_average_window)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Order the sprints, compute summary statistics and record index gaps.
    ///
    /// Fails only for an empty input or a repeated sprint index. Gaps are
    /// attached to the series as warnings.
    pub fn aggregate(&self, mut sprints: Vec<SprintMetrics>) -> Result<ProjectFinancialSeries> {
        if sprints.is_empty() {
            return Err(MetricsError::InsufficientData(
                "Cannot build a project series without any sprints".to_string(),
            ));
        }

        sprints.sort_by_key(SprintMetrics::sprint_index);

        let mut warnings = Vec::new();
        for pair in sprints.windows(2) {
            let (prev, next) = (pair[0].sprint_index(), pair[1].sprint_index());
            if prev == next {
                return Err(MetricsError::invalid(
                    pair[1].sprint_id(),
                    MetricField::SprintIndex,
                    InvalidReason::DuplicateIndex,
                ));
            }
            if next > prev + 1 {
                warn!(after = prev, next, "Sprint index gap in project history");
                warnings.push(SeriesWarning::IndexGap { after: prev, next });
            }
        }

        let summary = summarize(&sprints)?;

        let roi_points: Vec<(i64, Option<f64>)> = sprints
            .iter()
            .map(|s| (i64::from(s.sprint_index()), s.roi().value()))
            .collect();
        let moving_average_roi = trailing_mean(&roi_points, self.window)
            .map_err(|e| MetricsError::InsufficientData(e.to_string()))?
            .into_iter()
            .map(Ratio::from)
            .collect();

        let values: Vec<f64> =
            sprints.iter().map(SprintMetrics::estimated_business_value).collect();
        let cumulative_business_value = statistics::cumulative_sum(&values);

        debug!(
            sprints = sprints.len(),
            gaps = warnings.len(),
            mean_roi = %summary.mean_roi,
            "Built project financial series"
        );

        Ok(ProjectFinancialSeries {
            sprints,
            summary,
            moving_average_window: self.window,
            moving_average_roi,
            cumulative_business_value,
            warnings,
        })
    }
}

fn summarize(sprints: &[SprintMetrics]) -> Result<SeriesSummary> {
    let costs: Vec<f64> = sprints.iter().map(SprintMetrics::sprint_cost).collect();
    let velocities: Vec<f64> = sprints.iter().map(|s| f64::from(s.velocity())).collect();

    let to_metrics_error =
        |e: sprint_math::MathError| MetricsError::InsufficientData(e.to_string());

    let breakdowns: Vec<_> = sprints.iter().map(SprintMetrics::roi_breakdown).collect();

    Ok(SeriesSummary {
        sprint_count: sprints.len(),
        total_cost: costs.iter().sum(),
        mean_cost: statistics::mean(&costs).map_err(to_metrics_error)?,
        median_cost: statistics::median(&costs).map_err(to_metrics_error)?,
        mean_velocity: statistics::mean(&velocities).map_err(to_metrics_error)?,
        mean_roi: Ratio::mean_of_defined(breakdowns.iter().map(|b| b.roi)),
        mean_realized_roi: Ratio::mean_of_defined(breakdowns.iter().filter_map(|b| b.realized_roi)),
        mean_roi_variance: Ratio::mean_of_defined(breakdowns.iter().filter_map(|b| b.variance)),
        cumulative_business_value: sprints
            .iter()
            .map(SprintMetrics::estimated_business_value)
            .sum(),
        cumulative_actual_value: sprints
            .iter()
            .filter_map(SprintMetrics::actual_business_value)
            .sum(),
    })
}
