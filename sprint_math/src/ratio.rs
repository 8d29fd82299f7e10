//! Undefined-aware ratios
//!
//! A [`Ratio`] is the result of a division that may have no meaning, such as
//! a return on zero investment. `Undefined` is a distinct state: it is never
//! coerced to zero and is skipped by every aggregate in this workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A percentage or ratio that is either a finite value or undefined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    /// A defined, finite value
    Value(f64),
    /// The ratio has no meaning (zero denominator)
    Undefined,
}

impl Ratio {
    /// `numerator / denominator`, undefined when the denominator is exactly zero
    pub fn divide(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Ratio::Undefined;
        }
        Self::from_f64(numerator / denominator)
    }

    /// `numerator / denominator * 100`, undefined when the denominator is exactly zero
    pub fn percentage(numerator: f64, denominator: f64) -> Self {
        Self::divide(numerator, denominator).map(|r| r * 100.0)
    }

    /// Wrap a raw value, treating NaN and infinities as undefined
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Ratio::Value(value)
        } else {
            Ratio::Undefined
        }
    }

    /// The defined value, if any
    pub fn value(&self) -> Option<f64> {
        match *self {
            Ratio::Value(v) => Some(v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Ratio::Value(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Ratio::Undefined)
    }

    /// Apply `f` to a defined value; undefined stays undefined
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(f64) -> f64,
    {
        match self {
            Ratio::Value(v) => Self::from_f64(f(v)),
            Ratio::Undefined => Ratio::Undefined,
        }
    }

    /// `self - other`, undefined if either side is undefined
    pub fn difference(self, other: Ratio) -> Self {
        match (self, other) {
            (Ratio::Value(a), Ratio::Value(b)) => Self::from_f64(a - b),
            _ => Ratio::Undefined,
        }
    }

    /// Round a defined value to `places` decimal places
    pub fn rounded(self, places: u32) -> Self {
        let factor = 10f64.powi(places as i32);
        self.map(|v| (v * factor).round() / factor)
    }

    /// Mean over the defined entries only.
    ///
    /// Returns `Undefined` when no entry is defined.
    pub fn mean_of_defined<I>(ratios: I) -> Self
    where
        I: IntoIterator<Item = Ratio>,
    {
        let (sum, count) = ratios
            .into_iter()
            .filter_map(|r| r.value())
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

        if count == 0 {
            Ratio::Undefined
        } else {
            Self::from_f64(sum / count as f64)
        }
    }
}

impl From<Option<f64>> for Ratio {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Ratio::Undefined, Ratio::from_f64)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Value(v) => write!(f, "{:.2}%", v),
            Ratio::Undefined => write!(f, "undefined"),
        }
    }
}
