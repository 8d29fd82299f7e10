//! Additive seasonal decomposition of sprint metric series

use crate::data::Observation;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sprint_math::moving_averages::centered_moving_average;
use tracing::debug;

/// Seasonal offsets by phase, where phase is `sprint_index % period`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalComponent {
    pub period: usize,
    /// One additive offset per phase; the offsets sum to zero
    pub factors: Vec<f64>,
}

impl SeasonalComponent {
    /// Offset for the given sprint
    pub fn factor_for(&self, sprint_index: u32) -> f64 {
        self.factors[sprint_index as usize % self.period]
    }
}

/// Estimate the seasonal component of `observations` for `period`.
///
/// `observations` must be sorted by sprint index without duplicates.
///
/// Returns `None` when the observed span or the number of observations is
/// shorter than two full periods, or when missing sprints leave no complete
/// moving-average window.
///
/// The moving average is taken over each run of consecutive sprints. A gap
/// removes the windows that would cover it, and memory stays proportional to
/// the number of observations however far apart the sprints are.
pub fn seasonal_component(
    observations: &[Observation],
    period: usize,
) -> Result<Option<SeasonalComponent>> {
    let (first, last) = match (observations.first(), observations.last()) {
        (Some(f), Some(l)) => (f.sprint_index, l.sprint_index),
        _ => return Ok(None),
    };

    let span = (last - first) as usize + 1;
    let two_periods = period.saturating_mul(2);
    if period < 2 || span < two_periods || observations.len() < two_periods {
        debug!(
            period,
            span,
            observations = observations.len(),
            "Seasonality skipped: history shorter than two periods"
        );
        return Ok(None);
    }

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for run in contiguous_runs(observations) {
        let values: Vec<Option<f64>> = run.iter().map(|o| Some(o.value)).collect();
        let trend = centered_moving_average(&values, period)?;

        for (obs, level) in run.iter().zip(trend.iter()) {
            if let Some(t) = level {
                let phase = obs.sprint_index as usize % period;
                sums[phase] += obs.value - t;
                counts[phase] += 1;
            }
        }
    }

    if counts.iter().all(|&c| c == 0) {
        debug!(period, "Seasonality skipped: no complete detrending window");
        return Ok(None);
    }

    let mut factors: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| if c == 0 { 0.0 } else { s / c as f64 })
        .collect();

    let centre = factors.iter().sum::<f64>() / period as f64;
    for f in factors.iter_mut() {
        *f -= centre;
    }

    Ok(Some(SeasonalComponent { period, factors }))
}

/// Split sorted observations into runs of consecutive sprint indices
fn contiguous_runs(observations: &[Observation]) -> Vec<&[Observation]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..observations.len() {
        if observations[i - 1].sprint_index.checked_add(1) != Some(observations[i].sprint_index) {
            runs.push(&observations[start..i]);
            start = i;
        }
    }
    if start < observations.len() {
        runs.push(&observations[start..]);
    }
    runs
}
