//! Report output
//!
//! The AKI table has one row per patient with an empty cell wherever a value
//! is undefined. Trend files hold one row per observation together with the
//! baseline and window boundaries needed to chart it.
//!
//! Rows are turned into Arrow record batches with `serde_arrow` and written
//! with the Arrow CSV writer, so the column layout lives in one place.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, FieldRef};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithm::batch::TimelineCollection;
use crate::algorithm::timeline::{PatientTimeline, TrendSeries};
use crate::error::util::ensure_output_directory;
use crate::error::{AkiError, Result};
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar, log_operation_complete};

/// One row of the AKI table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AkiRow {
    /// Patient identifier
    #[serde(rename = "MRN")]
    pub patient_id: String,
    /// Baseline creatinine
    #[serde(rename = "baseCr")]
    pub baseline_cr: Option<f64>,
    /// Lowest pre-admission creatinine
    #[serde(rename = "minCr")]
    pub min_cr: Option<f64>,
    /// 25th percentile of pre-admission creatinine
    #[serde(rename = "25Cr")]
    pub cr25: Option<f64>,
    /// Highest creatinine during the stay
    #[serde(rename = "peakCr")]
    pub peak_cr: Option<f64>,
    /// CKD-EPI eGFR from the baseline
    #[serde(rename = "eGFR")]
    pub egfr: Option<f64>,
    /// CKD stage 2-5, empty when unstaged
    #[serde(rename = "CKD")]
    pub ckd_stage: Option<u8>,
}

impl From<&PatientTimeline> for AkiRow {
    fn from(timeline: &PatientTimeline) -> Self {
        Self {
            patient_id: timeline.patient_id().to_string(),
            baseline_cr: timeline.baseline_cr(),
            min_cr: timeline.min_cr(),
            cr25: timeline.cr25(),
            peak_cr: timeline.peak_cr(),
            egfr: timeline.egfr(),
            ckd_stage: timeline.ckd_stage().map(|stage| stage.as_u8()),
        }
    }
}

/// One row of a trend file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    /// Sample date
    pub date: NaiveDate,
    /// Creatinine on that date
    pub creatinine: f64,
    /// Patient baseline, repeated on every row
    pub baseline: Option<f64>,
    /// Exclusive start of the baseline window
    pub window_start: Option<NaiveDate>,
    /// Admission date
    pub admission: Option<NaiveDate>,
    /// Discharge date
    pub discharge: Option<NaiveDate>,
}

impl TrendRow {
    /// Expand a trend series into one row per observation
    #[must_use]
    pub fn rows(trend: &TrendSeries) -> Vec<Self> {
        trend
            .points
            .iter()
            .map(|point| Self {
                date: point.date,
                creatinine: point.value,
                baseline: trend.baseline,
                window_start: trend.window_start,
                admission: trend.admission,
                discharge: trend.discharge,
            })
            .collect()
    }
}

fn field(name: &str, data_type: DataType, nullable: bool) -> FieldRef {
    Arc::new(Field::new(name, data_type, nullable))
}

/// Columns of the AKI table
#[must_use]
pub fn aki_fields() -> Vec<FieldRef> {
    vec![
        field("MRN", DataType::Utf8, false),
        field("baseCr", DataType::Float64, true),
        field("minCr", DataType::Float64, true),
        field("25Cr", DataType::Float64, true),
        field("peakCr", DataType::Float64, true),
        field("eGFR", DataType::Float64, true),
        field("CKD", DataType::UInt8, true),
    ]
}

/// Columns of a trend file
#[must_use]
pub fn trend_fields() -> Vec<FieldRef> {
    vec![
        field("date", DataType::Utf8, false),
        field("creatinine", DataType::Float64, false),
        field("baseline", DataType::Float64, true),
        field("window_start", DataType::Utf8, true),
        field("admission", DataType::Utf8, true),
        field("discharge", DataType::Utf8, true),
    ]
}

/// Convert AKI rows into a record batch
pub fn aki_record_batch(rows: &[AkiRow]) -> Result<RecordBatch> {
    Ok(serde_arrow::to_record_batch(&aki_fields(), &rows)?)
}

fn write_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| AkiError::path_error_with_source("Failed to create output file", path, e))?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    Ok(())
}

/// Write the AKI table, creating the parent directory if needed
pub fn write_aki_table(path: &Path, rows: &[AkiRow]) -> Result<()> {
    let start = Instant::now();
    if let Some(parent) = path.parent() {
        ensure_output_directory(parent)?;
    }
    write_csv(path, &aki_record_batch(rows)?)?;
    log_operation_complete("wrote", path, rows.len(), "patients", Some(start.elapsed()));
    Ok(())
}

/// File name for a patient's trend.
///
/// ASCII letters, digits, `-` and `_` are kept; every other byte is written
/// as `%XX`, so distinct identifiers never share a file.
#[must_use]
pub fn trend_file_name(patient_id: &str) -> String {
    let mut name = String::with_capacity(patient_id.len() + 4);
    for byte in patient_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("%{byte:02X}"));
        }
    }
    name.push_str(".csv");
    name
}

/// Write one patient's trend file into `dir`
pub fn write_trend(dir: &Path, trend: &TrendSeries) -> Result<PathBuf> {
    let path = dir.join(trend_file_name(&trend.patient_id));
    let batch = serde_arrow::to_record_batch(&trend_fields(), &TrendRow::rows(trend))?;
    write_csv(&path, &batch)?;
    Ok(path)
}

/// Write a trend file for every patient in the collection
pub fn write_trends(dir: &Path, timelines: &TimelineCollection) -> Result<()> {
    let start = Instant::now();
    ensure_output_directory(dir)?;

    let pb = create_main_progress_bar(timelines.patient_count() as u64, Some("Writing trends"));
    for timeline in timelines {
        write_trend(dir, &timeline.trend())?;
        pb.inc(1);
    }
    finish_progress_bar(&pb, Some("Trends written"));

    log_operation_complete(
        "wrote",
        dir,
        timelines.patient_count(),
        "trend files",
        Some(start.elapsed()),
    );
    Ok(())
}
