//! Loading demographics and creatinine lab files
//!
//! Demographics columns are located by name. Lab files are positional: the
//! first column is the patient identifier, the second the creatinine value
//! and the third the collection date, whatever the headers say.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::models::demographics::{
    AdmissionWindow, DemographicsRecord, DemographicsTable, PatientId, normalize_patient_id,
};
use crate::models::observation::CreatinineSeries;
use crate::utils::arrow::{column_at, extract_codes, extract_float64s, extract_strings, find_column};
use crate::utils::date::{DateFormatConfig, parse_date_string};
use crate::utils::io::read_record_batches;
use crate::utils::logging::{log_operation_complete, log_warning};

/// Creatinine series per patient, ordered by patient identifier
pub type LabSeriesMap = BTreeMap<PatientId, CreatinineSeries>;

const LAB_ID_COLUMN: usize = 0;
const LAB_VALUE_COLUMN: usize = 1;
const LAB_DATE_COLUMN: usize = 2;

/// Load the demographics table.
///
/// Rows without a usable identifier or with unparseable admission or
/// discharge dates are skipped with a warning. A missing age is read as 0.
pub fn load_demographics(path: &Path, date_config: &DateFormatConfig) -> Result<DemographicsTable> {
    let start = Instant::now();
    let batches = read_record_batches(path)?;

    let mut table = DemographicsTable::new();
    let mut skipped = 0usize;
    for batch in &batches {
        skipped += read_demographics_batch(batch, date_config, &mut table)?;
    }

    if skipped > 0 {
        log_warning(&format!("Skipped {skipped} unusable demographics rows"), Some(path));
    }
    log_operation_complete("loaded", path, table.len(), "patients", Some(start.elapsed()));
    Ok(table)
}

/// Load the demographics table, or an empty one if the file does not exist
pub fn load_demographics_if_present(
    path: &Path,
    date_config: &DateFormatConfig,
) -> Result<DemographicsTable> {
    if path.exists() {
        load_demographics(path, date_config)
    } else {
        log_warning(
            "Demographics file not found, proceeding without eGFR calculation",
            Some(path),
        );
        Ok(DemographicsTable::new())
    }
}

fn read_demographics_batch(
    batch: &RecordBatch,
    date_config: &DateFormatConfig,
    table: &mut DemographicsTable,
) -> Result<usize> {
    let ids = extract_strings(batch.column(find_column(batch, "MRN")?))?;
    let ages = extract_float64s(batch.column(find_column(batch, "Age")?))?;
    let genders = extract_codes(batch.column(find_column(batch, "Gender")?))?;
    let races = extract_codes(batch.column(find_column(batch, "Race")?))?;
    let admissions = extract_strings(batch.column(find_column(batch, "AdmissionDate")?))?;
    let discharges = extract_strings(batch.column(find_column(batch, "DischargeDate")?))?;

    let parse = |value: &Option<String>| {
        value
            .as_deref()
            .and_then(|s| parse_date_string(s, date_config))
    };

    let mut skipped = 0;
    for row in 0..batch.num_rows() {
        let Some(patient_id) = ids[row].as_deref().and_then(normalize_patient_id) else {
            skipped += 1;
            continue;
        };
        let (Some(admission), Some(discharge)) = (parse(&admissions[row]), parse(&discharges[row]))
        else {
            log::warn!("Patient {patient_id}: unparseable admission or discharge date, skipping");
            skipped += 1;
            continue;
        };
        if discharge < admission {
            log::warn!("Patient {patient_id}: discharge {discharge} precedes admission {admission}");
        }

        let age = match ages[row] {
            Some(age) if age >= 0.0 => age.trunc() as u32,
            _ => {
                log::warn!("Patient {patient_id}: missing or invalid age, using 0");
                0
            }
        };

        let record = DemographicsRecord {
            patient_id,
            age,
            gender: genders[row].clone(),
            race: races[row].clone(),
            window: AdmissionWindow::new(admission, discharge),
        };
        table.insert(record.normalize());
    }
    Ok(skipped)
}

/// Counts from reading lab files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabLoadStats {
    /// Rows read across all files
    pub rows: usize,
    /// Rows kept as observations
    pub kept: usize,
    /// Rows without an identifier or value
    pub missing: usize,
    /// Rows whose date could not be parsed
    pub bad_dates: usize,
    /// Kept rows that replaced an earlier value on the same date
    pub replaced: usize,
}

/// Load and merge lab files into one series per patient.
///
/// Files are read in the order given; a later value for the same patient
/// and date replaces an earlier one.
pub fn load_labs(files: &[PathBuf], date_config: &DateFormatConfig) -> Result<LabSeriesMap> {
    load_labs_with_stats(files, date_config).map(|(labs, _)| labs)
}

/// Same as [`load_labs`], also returning row counts
pub fn load_labs_with_stats(
    files: &[PathBuf],
    date_config: &DateFormatConfig,
) -> Result<(LabSeriesMap, LabLoadStats)> {
    let mut labs = LabSeriesMap::new();
    let mut stats = LabLoadStats::default();

    for path in files {
        let start = Instant::now();
        let before = stats.kept;
        for batch in read_record_batches(path)? {
            read_lab_batch(&batch, date_config, &mut labs, &mut stats)?;
        }
        log_operation_complete(
            "loaded",
            path,
            stats.kept - before,
            "creatinine values",
            Some(start.elapsed()),
        );
    }

    if stats.missing > 0 || stats.bad_dates > 0 {
        log::warn!(
            "Dropped {} of {} lab rows: {} without identifier or value, {} with unparseable dates",
            stats.missing + stats.bad_dates,
            stats.rows,
            stats.missing,
            stats.bad_dates
        );
    }
    log::info!(
        "Loaded {} creatinine values from {} rows for {} patients ({} same-day replacements)",
        stats.kept,
        stats.rows,
        labs.len(),
        stats.replaced
    );
    Ok((labs, stats))
}

fn read_lab_batch(
    batch: &RecordBatch,
    date_config: &DateFormatConfig,
    labs: &mut LabSeriesMap,
    stats: &mut LabLoadStats,
) -> Result<()> {
    let ids = extract_strings(column_at(batch, LAB_ID_COLUMN)?)?;
    let values = extract_float64s(column_at(batch, LAB_VALUE_COLUMN)?)?;
    let dates = extract_strings(column_at(batch, LAB_DATE_COLUMN)?)?;

    for row in 0..batch.num_rows() {
        stats.rows += 1;
        let (Some(patient_id), Some(value)) =
            (ids[row].as_deref().and_then(normalize_patient_id), values[row])
        else {
            stats.missing += 1;
            continue;
        };
        let Some(date) = dates[row]
            .as_deref()
            .and_then(|s| parse_date_string(s, date_config))
        else {
            log::debug!("Patient {patient_id}: unparseable lab date {:?}", dates[row]);
            stats.bad_dates += 1;
            continue;
        };

        if labs.entry(patient_id).or_default().insert(date, value).is_some() {
            stats.replaced += 1;
        }
        stats.kept += 1;
    }
    Ok(())
}
