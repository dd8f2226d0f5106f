//! Serum creatinine observations
//!
//! A patient's creatinine history is keyed by calendar date. Two results on
//! the same date collapse to the one inserted last.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single serum creatinine result (mg/dL)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatinineObservation {
    /// Date the sample was taken
    pub date: NaiveDate,
    /// Creatinine value in mg/dL
    pub value: f64,
}

impl CreatinineObservation {
    /// Create a new observation
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Chronological creatinine history for one patient
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatinineSeries {
    values: BTreeMap<NaiveDate, f64>,
}

impl CreatinineSeries {
    /// Create an empty series
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value, replacing any earlier value for the same date
    pub fn insert(&mut self, date: NaiveDate, value: f64) -> Option<f64> {
        self.values.insert(date, value)
    }

    /// Number of distinct dates with a value
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value recorded on exactly `date`
    #[must_use]
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }

    /// Observations in chronological order
    pub fn iter(&self) -> impl Iterator<Item = CreatinineObservation> + '_ {
        self.values
            .iter()
            .map(|(&date, &value)| CreatinineObservation::new(date, value))
    }

    /// Observations whose date satisfies `predicate`, in chronological order
    #[must_use]
    pub fn select<P>(&self, predicate: P) -> Vec<CreatinineObservation>
    where
        P: Fn(NaiveDate) -> bool,
    {
        self.iter().filter(|obs| predicate(obs.date)).collect()
    }

    /// Earliest observation date
    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.values.keys().next().copied()
    }

    /// Latest observation date
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.values.keys().next_back().copied()
    }
}

impl FromIterator<(NaiveDate, f64)> for CreatinineSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut series = Self::new();
        for (date, value) in iter {
            series.insert(date, value);
        }
        series
    }
}

impl FromIterator<CreatinineObservation> for CreatinineSeries {
    fn from_iter<I: IntoIterator<Item = CreatinineObservation>>(iter: I) -> Self {
        iter.into_iter().map(|obs| (obs.date, obs.value)).collect()
    }
}
