//! Observation series extracted from a project's sprint history

use serde::{Deserialize, Serialize};
use sprint_metrics::{ProjectFinancialSeries, SeriesWarning};
use std::fmt;

/// The sprint metric a forecast is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMetric {
    Cost,
    EstimatedValue,
    Roi,
}

impl ForecastMetric {
    /// Whether forecasts of this metric are clamped at zero
    pub fn is_non_negative(&self) -> bool {
        matches!(self, ForecastMetric::Cost | ForecastMetric::EstimatedValue)
    }
}

impl fmt::Display for ForecastMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForecastMetric::Cost => "cost",
            ForecastMetric::EstimatedValue => "estimated value",
            ForecastMetric::Roi => "ROI",
        };
        f.write_str(name)
    }
}

/// One observed value of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub sprint_index: u32,
    pub value: f64,
}

impl Observation {
    pub fn new(sprint_index: u32, value: f64) -> Self {
        Self { sprint_index, value }
    }

    pub(crate) fn point(&self) -> (f64, f64) {
        (f64::from(self.sprint_index), self.value)
    }
}

/// The observed values of one metric, ordered by sprint index.
///
/// Sprints absent from the project history and sprints whose ROI is
/// undefined are missing observations. They are never filled with zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    metric: ForecastMetric,
    observations: Vec<Observation>,
    /// Index of the latest sprint in the project, observed or not
    last_sprint_index: u32,
    /// Sprints present in the history whose metric is undefined
    undefined_indices: Vec<u32>,
    /// Sprint indices absent from the history
    gap_indices: Vec<u32>,
    warnings: Vec<SeriesWarning>,
}

impl MetricSeries {
    /// Extract `metric` from a project series
    pub fn from_series(series: &ProjectFinancialSeries, metric: ForecastMetric) -> Self {
        let mut observations = Vec::with_capacity(series.sprint_count());
        let mut undefined_indices = Vec::new();

        for sprint in series.sprints() {
            let value = match metric {
                ForecastMetric::Cost => Some(sprint.sprint_cost()),
                ForecastMetric::EstimatedValue => Some(sprint.estimated_business_value()),
                ForecastMetric::Roi => sprint.roi().value(),
            };

            match value {
                Some(v) => observations.push(Observation::new(sprint.sprint_index(), v)),
                None => undefined_indices.push(sprint.sprint_index()),
            }
        }

        Self {
            metric,
            observations,
            last_sprint_index: series.last_index(),
            undefined_indices,
            gap_indices: series.missing_indices(),
            warnings: series.warnings().to_vec(),
        }
    }

    /// Build a series directly from observations.
    ///
    /// Observations are sorted by sprint index; later duplicates are dropped.
    pub fn from_observations(metric: ForecastMetric, mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.sprint_index);
        observations.dedup_by_key(|o| o.sprint_index);

        let last_sprint_index = observations.last().map_or(0, |o| o.sprint_index);
        let gap_indices = observations
            .windows(2)
            .flat_map(|w| w[0].sprint_index + 1..w[1].sprint_index)
            .collect();

        Self {
            metric,
            observations,
            last_sprint_index,
            undefined_indices: Vec::new(),
            gap_indices,
            warnings: Vec::new(),
        }
    }

    pub fn metric(&self) -> ForecastMetric {
        self.metric
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn last_sprint_index(&self) -> u32 {
        self.last_sprint_index
    }

    /// Every sprint index without an observation between the first and last sprint
    pub fn missing_indices(&self) -> Vec<u32> {
        let mut missing: Vec<u32> = self
            .gap_indices
            .iter()
            .chain(self.undefined_indices.iter())
            .copied()
            .collect();
        missing.sort_unstable();
        missing
    }

    pub fn warnings(&self) -> &[SeriesWarning] {
        &self.warnings
    }

    /// Observations as `(sprint index, value)` points
    pub(crate) fn points(&self) -> Vec<(f64, f64)> {
        self.observations.iter().map(Observation::point).collect()
    }

    /// Split into the first `len - holdout` observations and the held-out rest.
    ///
    /// The training part ends at its own last observation.
    pub fn split_holdout(&self, holdout: usize) -> (MetricSeries, Vec<Observation>) {
        let cut = self.observations.len().saturating_sub(holdout);
        let (train, test) = self.observations.split_at(cut);

        let last_sprint_index = train.last().map_or(0, |o| o.sprint_index);
        let training = MetricSeries {
            metric: self.metric,
            observations: train.to_vec(),
            last_sprint_index,
            undefined_indices: self
                .undefined_indices
                .iter()
                .copied()
                .filter(|i| *i < last_sprint_index)
                .collect(),
            gap_indices: self
                .gap_indices
                .iter()
                .copied()
                .filter(|i| *i < last_sprint_index)
                .collect(),
            warnings: Vec::new(),
        };

        (training, test.to_vec())
    }
}
