//! Summary statistics over creatinine windows
//!
//! Every function here returns `None` for an empty input instead of
//! panicking or producing NaN, so a missing baseline stays visible as
//! "undefined" all the way to the report.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{AkiError, Result};

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Median of the values
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 50.0)
}

/// Arithmetic mean of the values
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Smallest value
#[must_use]
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Largest value
#[must_use]
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Percentile `p` (0-100) with linear interpolation between closest ranks
///
/// The rank of `p` is `p / 100 × (n - 1)` over the sorted values, so the
/// 25th percentile of `[1, 2, 3, 4]` is 1.75.
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    let sorted = sorted(values);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Statistic used to turn the pre-admission window into a baseline value
#[derive(Debug, Clone, Copy, Default)]
pub enum BaselineStatistic {
    /// Median of the window
    #[default]
    Median,
    /// Mean of the window
    Mean,
    /// Lowest value in the window
    Min,
    /// Percentile (0-100) of the window
    Percentile(f64),
    /// Any other reduction over a non-empty window
    Custom(fn(&[f64]) -> f64),
}

impl BaselineStatistic {
    /// Apply the statistic; `None` for an empty window
    #[must_use]
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Median => median(values),
            Self::Mean => mean(values),
            Self::Min => min(values),
            Self::Percentile(p) => percentile(values, *p),
            Self::Custom(f) => (!values.is_empty()).then(|| f(values)),
        }
    }
}

impl fmt::Display for BaselineStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Median => write!(f, "median"),
            Self::Mean => write!(f, "mean"),
            Self::Min => write!(f, "min"),
            Self::Percentile(p) => write!(f, "p{p}"),
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}

impl FromStr for BaselineStatistic {
    type Err = AkiError;

    /// Accepts `median`, `mean`, `min` and `pNN` (e.g. `p25`)
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            other => other
                .strip_prefix('p')
                .and_then(|p| p.parse::<f64>().ok())
                .filter(|p| (0.0..=100.0).contains(p))
                .map(Self::Percentile)
                .ok_or_else(|| AkiError::Config(format!("Unknown baseline statistic: {s}"))),
        }
    }
}
