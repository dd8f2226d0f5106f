//! Batch construction of patient timelines
//!
//! Each patient's timeline depends only on that patient's series and
//! demographics row, so timelines are built in parallel. The demographics
//! table is shared read-only across workers.

use std::collections::{BTreeMap, btree_map};
use std::time::Instant;

use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::algorithm::egfr::CkdStage;
use crate::algorithm::timeline::PatientTimeline;
use crate::config::{BatchConfig, TimelineConfig};
use crate::error::{AkiError, Result};
use crate::loader::{LabSeriesMap, load_demographics_if_present, load_labs};
use crate::models::demographics::{DemographicsTable, PatientId};
use crate::report::{AkiRow, write_aki_table, write_trends};
use crate::utils::io::find_input_files;
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar};

/// Build one timeline per patient with at least one observation.
///
/// Patients without a demographics row get a timeline with no admission
/// window. The result is ordered by patient identifier.
#[must_use]
pub fn build_timelines(
    demographics: &DemographicsTable,
    labs: LabSeriesMap,
    config: &TimelineConfig,
) -> TimelineCollection {
    let start = Instant::now();
    let pb = create_main_progress_bar(labs.len() as u64, Some("Building timelines"));

    let timelines: Vec<PatientTimeline> = labs
        .into_par_iter()
        .progress_with(pb.clone())
        .filter_map(|(patient_id, series)| {
            if series.is_empty() {
                log::debug!("Patient {patient_id}: no usable creatinine values, skipping");
                return None;
            }
            let timeline = match demographics.get(&patient_id) {
                Some(row) => {
                    PatientTimeline::build(patient_id, Some(row), row.window, series, config)
                }
                None => {
                    log::debug!("Patient {patient_id}: no demographics row");
                    PatientTimeline::without_admission(patient_id, series)
                }
            };
            Some(timeline)
        })
        .collect();

    finish_progress_bar(&pb, Some("Timelines built"));
    let collection = TimelineCollection::new(timelines);
    log::info!(
        "Built {} patient timelines in {:?}",
        collection.patient_count(),
        start.elapsed()
    );
    collection
}

/// Timelines for a batch, ordered by patient identifier
#[derive(Debug, Clone, Default)]
pub struct TimelineCollection {
    timelines: BTreeMap<PatientId, PatientTimeline>,
}

impl TimelineCollection {
    /// Collect timelines; a later timeline for the same patient replaces an earlier one
    #[must_use]
    pub fn new(timelines: impl IntoIterator<Item = PatientTimeline>) -> Self {
        Self {
            timelines: timelines
                .into_iter()
                .map(|t| (t.patient_id().to_string(), t))
                .collect(),
        }
    }

    /// Number of patients
    #[must_use]
    pub fn patient_count(&self) -> usize {
        self.timelines.len()
    }

    /// Total creatinine values across all patients
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.timelines
            .values()
            .map(PatientTimeline::observation_count)
            .sum()
    }

    /// Look up one patient
    #[must_use]
    pub fn get(&self, patient_id: &str) -> Option<&PatientTimeline> {
        self.timelines.get(patient_id)
    }

    /// Timelines in patient order
    pub fn iter(&self) -> btree_map::Values<'_, PatientId, PatientTimeline> {
        self.timelines.values()
    }

    /// Flat report rows in patient order
    #[must_use]
    pub fn report_rows(&self) -> Vec<AkiRow> {
        self.iter().map(AkiRow::from).collect()
    }

    /// Patients per CKD stage; `None` counts unstaged patients
    #[must_use]
    pub fn stage_counts(&self) -> BTreeMap<Option<CkdStage>, usize> {
        let mut counts = BTreeMap::new();
        for timeline in self.iter() {
            *counts.entry(timeline.ckd_stage()).or_insert(0) += 1;
        }
        counts
    }

    /// One-line summary of the batch
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Processed {} patients, and {} laboratory values",
            self.patient_count(),
            self.observation_count()
        )
    }
}

impl<'a> IntoIterator for &'a TimelineCollection {
    type Item = &'a PatientTimeline;
    type IntoIter = btree_map::Values<'a, PatientId, PatientTimeline>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Counts reported at the end of a batch run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Lab files read
    pub lab_files: usize,
    /// Patients with a demographics row
    pub demographics_rows: usize,
    /// Patients with a timeline
    pub patients: usize,
    /// Creatinine values across all timelines
    pub observations: usize,
    /// Patients with a defined eGFR
    pub patients_with_egfr: usize,
}

/// Load inputs, build timelines and write outputs for one batch run
pub fn run_batch(config: &BatchConfig) -> Result<(TimelineCollection, BatchSummary)> {
    log::info!("Starting batch run\n{config}");

    let demographics =
        load_demographics_if_present(&config.demographics_path(), &config.date_format_config)?;
    let lab_files = find_input_files(&config.input_dir, &config.lab_file_prefix)?;
    let labs = load_labs(&lab_files, &config.date_format_config)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| AkiError::Config(format!("Failed to create worker pool: {e}")))?;
    let timelines = pool.install(|| build_timelines(&demographics, labs, &config.timeline));

    write_aki_table(&config.output_dir.join("AKI.csv"), &timelines.report_rows())?;
    if config.write_trends {
        write_trends(&config.output_dir.join("Trends"), &timelines)?;
    }

    let summary = BatchSummary {
        lab_files: lab_files.len(),
        demographics_rows: demographics.len(),
        patients: timelines.patient_count(),
        observations: timelines.observation_count(),
        patients_with_egfr: timelines.iter().filter(|t| t.egfr().is_some()).count(),
    };
    Ok((timelines, summary))
}
