//! Patient demographics and admission windows

use chrono::{Duration, NaiveDate};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::models::types::{Gender, Race, RawCode};

/// Opaque patient identifier (medical record number)
pub type PatientId = String;

/// Normalize an identifier read from a file so `1`, `1.0` and `" 1 "` coincide
#[must_use]
pub fn normalize_patient_id(raw: &str) -> Option<PatientId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if !f.is_finite() {
            return None;
        }
        if f.fract() == 0.0 && trimmed.contains('.') {
            return Some(format!("{}", f as i64));
        }
    }
    Some(trimmed.to_string())
}

/// Hospital stay boundaries
///
/// `discharge` is expected on or after `admission` but this is not checked;
/// an inverted window simply contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdmissionWindow {
    /// Date of admission
    pub admission: NaiveDate,
    /// Date of discharge
    pub discharge: NaiveDate,
}

impl AdmissionWindow {
    /// Create a new admission window
    #[must_use]
    pub const fn new(admission: NaiveDate, discharge: NaiveDate) -> Self {
        Self {
            admission,
            discharge,
        }
    }

    /// Exclusive lower bound of the baseline window.
    ///
    /// `None` when the lookback reaches past the earliest representable
    /// date; the window then has no lower bound.
    #[must_use]
    pub fn lookback_start(&self, lookback_days: i64) -> Option<NaiveDate> {
        Duration::try_days(lookback_days).and_then(|span| self.admission.checked_sub_signed(span))
    }

    /// Strictly between `admission - lookback_days` and `admission`
    #[must_use]
    pub fn is_pre_admission(&self, date: NaiveDate, lookback_days: i64) -> bool {
        date < self.admission && self.lookback_start(lookback_days).is_none_or(|start| date > start)
    }

    /// Between admission and discharge, both inclusive
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.admission && date <= self.discharge
    }

    /// Length of stay in days, `None` when discharge precedes admission
    #[must_use]
    pub fn length_of_stay(&self) -> Option<i64> {
        let days = (self.discharge - self.admission).num_days();
        (days >= 0).then_some(days)
    }
}

/// A demographics row as read from input, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicsRecord {
    /// Patient identifier
    pub patient_id: PatientId,
    /// Age in whole years
    pub age: u32,
    /// Gender in whatever encoding the file used
    pub gender: RawCode,
    /// Race in whatever encoding the file used
    pub race: RawCode,
    /// Admission and discharge dates
    pub window: AdmissionWindow,
}

impl DemographicsRecord {
    /// Normalize the categorical codes.
    ///
    /// An unrecognized gender is logged and left unset so the patient keeps
    /// its admission window but gets no eGFR. Unrecognized race maps to
    /// `Race::Other`.
    #[must_use]
    pub fn normalize(&self) -> Demographics {
        let gender = match Gender::try_from(&self.gender) {
            Ok(gender) => Some(gender),
            Err(e) => {
                log::warn!("Patient {}: {e}; eGFR will be undefined", self.patient_id);
                None
            }
        };

        Demographics {
            patient_id: self.patient_id.clone(),
            age: self.age,
            gender,
            race: Race::from(&self.race),
            window: self.window,
        }
    }
}

/// Normalized demographics for one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    /// Patient identifier
    pub patient_id: PatientId,
    /// Age in whole years
    pub age: u32,
    /// `None` when the input value matched no gender encoding
    pub gender: Option<Gender>,
    /// Race category
    pub race: Race,
    /// Admission and discharge dates
    pub window: AdmissionWindow,
}

impl Demographics {
    /// Create normalized demographics directly
    #[must_use]
    pub fn new(
        patient_id: impl Into<PatientId>,
        age: u32,
        gender: Gender,
        race: Race,
        window: AdmissionWindow,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            age,
            gender: Some(gender),
            race,
            window,
        }
    }
}

/// Read-only lookup of demographics by patient identifier
#[derive(Debug, Clone, Default)]
pub struct DemographicsTable {
    rows: FxHashMap<PatientId, Demographics>,
}

impl DemographicsTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row; a later row for the same patient replaces the earlier one
    pub fn insert(&mut self, demographics: Demographics) {
        self.rows.insert(demographics.patient_id.clone(), demographics);
    }

    /// Look up a patient
    #[must_use]
    pub fn get(&self, patient_id: &str) -> Option<&Demographics> {
        self.rows.get(patient_id)
    }

    /// Number of patients in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<Demographics> for DemographicsTable {
    fn from_iter<I: IntoIterator<Item = Demographics>>(iter: I) -> Self {
        let mut table = Self::new();
        for row in iter {
            table.insert(row);
        }
        table
    }
}
