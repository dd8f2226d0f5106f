//! Patient creatinine timeline
//!
//! A [`PatientTimeline`] splits a patient's creatinine history around the
//! hospital stay:
//!
//! * the pre-admission window, `admission - lookback < date < admission`,
//!   from which the baseline, minimum and 25th percentile are derived;
//! * the in-admission window, `admission <= date <= discharge`, from which
//!   the peak is derived.
//!
//! The two windows cannot overlap. Every derived value is computed once in
//! the constructor and is `None` when the data needed for it is missing.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithm::egfr::{CkdStage, ckd_epi};
use crate::algorithm::statistics;
use crate::config::TimelineConfig;
use crate::models::demographics::{AdmissionWindow, Demographics, PatientId};
use crate::models::observation::{CreatinineObservation, CreatinineSeries};

/// Percentile reported alongside the baseline
const LOW_PERCENTILE: f64 = 25.0;

/// Values derived from a patient's timeline
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TimelineMetrics {
    /// Configured statistic over the pre-admission window
    pub baseline_cr: Option<f64>,
    /// Minimum over the pre-admission window
    pub min_cr: Option<f64>,
    /// 25th percentile over the pre-admission window
    pub cr25: Option<f64>,
    /// Maximum over the in-admission window
    pub peak_cr: Option<f64>,
    /// Value recorded on the admission date
    pub admit_cr: Option<f64>,
    /// CKD-EPI eGFR from the baseline
    pub egfr: Option<f64>,
    /// CKD stage from the eGFR
    pub ckd_stage: Option<CkdStage>,
}

/// Data needed to chart a patient's creatinine trend
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    /// Patient identifier
    pub patient_id: PatientId,
    /// Every observation, in chronological order
    pub points: Vec<CreatinineObservation>,
    /// Horizontal baseline line
    pub baseline: Option<f64>,
    /// Exclusive start of the baseline window, `None` when unbounded
    pub window_start: Option<NaiveDate>,
    /// Admission date
    pub admission: Option<NaiveDate>,
    /// Discharge date
    pub discharge: Option<NaiveDate>,
}

/// One patient's creatinine history partitioned around an admission
#[derive(Debug, Clone)]
pub struct PatientTimeline {
    patient_id: PatientId,
    demographics: Option<Demographics>,
    window: Option<AdmissionWindow>,
    lookback_days: i64,
    observations: CreatinineSeries,
    pre_admission: Vec<CreatinineObservation>,
    in_admission: Vec<CreatinineObservation>,
    metrics: TimelineMetrics,
}

fn values(observations: &[CreatinineObservation]) -> Vec<f64> {
    observations.iter().map(|obs| obs.value).collect()
}

impl PatientTimeline {
    /// Build a timeline for one patient.
    ///
    /// `demographics` is optional; without it (or without a recognized
    /// gender) the eGFR and CKD stage stay undefined while the creatinine
    /// statistics are still computed.
    #[must_use]
    pub fn build(
        patient_id: impl Into<PatientId>,
        demographics: Option<&Demographics>,
        window: AdmissionWindow,
        observations: CreatinineSeries,
        config: &TimelineConfig,
    ) -> Self {
        let patient_id = patient_id.into();
        let mut timeline = Self {
            patient_id,
            demographics: demographics.cloned(),
            window: Some(window),
            lookback_days: config.lookback_days,
            observations,
            pre_admission: Vec::new(),
            in_admission: Vec::new(),
            metrics: TimelineMetrics::default(),
        };

        if timeline.observations.is_empty() {
            log::debug!("Patient {}: no observations", timeline.patient_id);
            return timeline;
        }

        timeline.pre_admission = timeline
            .observations
            .select(|date| window.is_pre_admission(date, config.lookback_days));
        timeline.in_admission = timeline.observations.select(|date| window.contains(date));

        let before = values(&timeline.pre_admission);
        let during = values(&timeline.in_admission);

        let baseline_cr = config.baseline_statistic.apply(&before);
        let egfr = timeline.estimate_egfr(baseline_cr);

        timeline.metrics = TimelineMetrics {
            baseline_cr,
            min_cr: statistics::min(&before),
            cr25: statistics::percentile(&before, LOW_PERCENTILE),
            peak_cr: statistics::max(&during),
            admit_cr: timeline.observations.value_on(window.admission),
            egfr,
            ckd_stage: CkdStage::from_egfr(egfr),
        };

        log::trace!("Built timeline {}: {:?}", timeline, timeline.metrics);
        timeline
    }

    /// Timeline for a patient whose labs have no demographics row.
    ///
    /// With no admission window both partitions are empty and every derived
    /// value is undefined; the full series is kept for trend output.
    #[must_use]
    pub fn without_admission(patient_id: impl Into<PatientId>, observations: CreatinineSeries) -> Self {
        Self {
            patient_id: patient_id.into(),
            demographics: None,
            window: None,
            lookback_days: 0,
            observations,
            pre_admission: Vec::new(),
            in_admission: Vec::new(),
            metrics: TimelineMetrics::default(),
        }
    }

    fn estimate_egfr(&self, baseline_cr: Option<f64>) -> Option<f64> {
        let demographics = self.demographics.as_ref()?;
        let gender = demographics.gender?;
        let baseline = baseline_cr?;

        let egfr = ckd_epi(baseline, demographics.age, gender, demographics.race);
        egfr.is_finite().then_some(egfr)
    }

    /// Patient identifier
    #[must_use]
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Demographics used for the eGFR, if any
    #[must_use]
    pub fn demographics(&self) -> Option<&Demographics> {
        self.demographics.as_ref()
    }

    /// Admission window, `None` for patients without demographics
    #[must_use]
    pub fn window(&self) -> Option<AdmissionWindow> {
        self.window
    }

    /// The full chronological series
    #[must_use]
    pub fn observations(&self) -> &CreatinineSeries {
        &self.observations
    }

    /// Observations inside the baseline window
    #[must_use]
    pub fn pre_admission(&self) -> &[CreatinineObservation] {
        &self.pre_admission
    }

    /// Observations during the hospital stay
    #[must_use]
    pub fn in_admission(&self) -> &[CreatinineObservation] {
        &self.in_admission
    }

    /// All derived values
    #[must_use]
    pub fn metrics(&self) -> &TimelineMetrics {
        &self.metrics
    }

    /// Baseline creatinine
    #[must_use]
    pub fn baseline_cr(&self) -> Option<f64> {
        self.metrics.baseline_cr
    }

    /// Lowest pre-admission creatinine
    #[must_use]
    pub fn min_cr(&self) -> Option<f64> {
        self.metrics.min_cr
    }

    /// 25th percentile of pre-admission creatinine
    #[must_use]
    pub fn cr25(&self) -> Option<f64> {
        self.metrics.cr25
    }

    /// Peak creatinine during the stay
    #[must_use]
    pub fn peak_cr(&self) -> Option<f64> {
        self.metrics.peak_cr
    }

    /// Creatinine on the admission date
    #[must_use]
    pub fn admit_cr(&self) -> Option<f64> {
        self.metrics.admit_cr
    }

    /// CKD-EPI eGFR from the baseline
    #[must_use]
    pub fn egfr(&self) -> Option<f64> {
        self.metrics.egfr
    }

    /// CKD stage, `None` when eGFR is undefined or ≥ 90
    #[must_use]
    pub fn ckd_stage(&self) -> Option<CkdStage> {
        self.metrics.ckd_stage
    }

    /// Peak over baseline; the ratio AKI criteria are expressed in
    #[must_use]
    pub fn aki_ratio(&self) -> Option<f64> {
        let baseline = self.metrics.baseline_cr.filter(|b| *b > 0.0)?;
        Some(self.metrics.peak_cr? / baseline)
    }

    /// Number of observations in the full series
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Date of the earliest observation
    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first_date()
    }

    /// Date of the latest observation
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last_date()
    }

    /// Chart data: the series, the baseline and the window boundaries
    #[must_use]
    pub fn trend(&self) -> TrendSeries {
        TrendSeries {
            patient_id: self.patient_id.clone(),
            points: self.observations.iter().collect(),
            baseline: self.metrics.baseline_cr,
            window_start: self.window.and_then(|w| w.lookback_start(self.lookback_days)),
            admission: self.window.map(|w| w.admission),
            discharge: self.window.map(|w| w.discharge),
        }
    }
}

impl fmt::Display for PatientTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (age, gender, race) = match &self.demographics {
            Some(d) => (
                d.age.to_string(),
                d.gender.map_or_else(|| "?".to_string(), |g| g.to_string()),
                d.race.to_string(),
            ),
            None => ("?".to_string(), "?".to_string(), "?".to_string()),
        };
        let admission = self
            .window
            .map_or_else(|| "?".to_string(), |w| w.admission.to_string());

        write!(
            f,
            "<MRN {}, Age {}, Gender {}, Race {}, Hosp. {}, Num CRS {}>",
            self.patient_id,
            age,
            gender,
            race,
            admission,
            self.observations.len()
        )
    }
}
