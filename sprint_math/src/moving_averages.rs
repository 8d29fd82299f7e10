//! Moving average calculation implementations
//!
//! Contains moving averages that tolerate missing observations:
//! - Trailing mean over sparsely indexed points (smoothing)
//! - Centered moving average over a regular grid (detrending)

use crate::{MathError, Result};

/// Trailing mean over points keyed by an integer position.
///
/// For each point at position `x` the window covers positions
/// `x - window + 1 ..= x`. Positions that are absent from `points`, or present
/// with `None`, are missing and are skipped rather than counted as zero. The
/// output is aligned with `points`; an entry is `None` until the window spans
/// `window` positions from the first point, or when no value in the window is
/// defined.
///
/// `points` must be sorted by position.
pub fn trailing_mean(points: &[(i64, Option<f64>)], window: usize) -> Result<Vec<Option<f64>>> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window must be greater than zero".to_string(),
        ));
    }

    if points.windows(2).any(|w| w[1].0 <= w[0].0) {
        return Err(MathError::InvalidInput(
            "Points must be strictly increasing by position".to_string(),
        ));
    }

    let first = match points.first() {
        Some((x, _)) => *x,
        None => return Ok(Vec::new()),
    };
    let span = window as i64;

    let mut out = Vec::with_capacity(points.len());
    let mut start = 0;

    for (i, &(x, _)) in points.iter().enumerate() {
        if x - first + 1 < span {
            out.push(None);
            continue;
        }

        while points[start].0 <= x - span {
            start += 1;
        }

        let (sum, count) = points[start..=i]
            .iter()
            .filter_map(|(_, v)| *v)
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));

        out.push(if count == 0 { None } else { Some(sum / count as f64) });
    }

    Ok(out)
}

/// Centered moving average over a regularly spaced series.
///
/// An odd `period` averages the `period` values centred on each point. An even
/// `period` uses the classical `2 x period` average, weighting the two outer
/// values by one half, so that the result stays centred. An entry is `None`
/// at the edges and wherever any value inside its window is missing.
pub fn centered_moving_average(values: &[Option<f64>], period: usize) -> Result<Vec<Option<f64>>> {
    if period < 2 {
        return Err(MathError::InvalidInput(
            "Period must be at least 2 for a centered moving average".to_string(),
        ));
    }

    let n = values.len();
    let half = period / 2;
    let mut out = vec![None; n];

    if n < 2 * half + 1 {
        return Ok(out);
    }

    for i in half..n - half {
        let window = &values[i - half..=i + half];
        if window.iter().any(Option::is_none) {
            continue;
        }

        let avg = if period % 2 == 1 {
            window.iter().flatten().sum::<f64>() / period as f64
        } else {
            let last = window.len() - 1;
            let weighted: f64 = window
                .iter()
                .flatten()
                .enumerate()
                .map(|(j, v)| if j == 0 || j == last { v * 0.5 } else { *v })
                .sum();
            weighted / period as f64
        };

        out[i] = Some(avg);
    }

    Ok(out)
}
