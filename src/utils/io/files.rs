//! Input file discovery and reading
//!
//! Demographics and lab exports may be CSV or Parquet. Both are read into
//! Arrow record batches. CSV columns are always read as nullable text so a
//! malformed cell anywhere in the file only affects its own row; typed
//! conversion happens per cell in the extractors.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::util::{safe_open_file, validate_directory};
use crate::error::{AkiError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Default batch size for reading input files
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl InputFormat {
    /// Detect the format from the file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Find input files in `dir` whose name starts with `prefix`, sorted by name
///
/// Sorting keeps the merge order of lab files, and therefore which value
/// wins for a duplicated date, independent of directory listing order.
pub fn find_input_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for input files in", dir);
    validate_directory(dir, "input files")?;

    let entries = std::fs::read_dir(dir)
        .map_err(|e| AkiError::path_error_with_source("Failed to read directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches_prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(prefix));
        if path.is_file() && matches_prefix && InputFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    let files = files.into_iter().sorted().collect_vec();

    if files.is_empty() {
        log_warning(&format!("No {prefix}* input files found"), Some(dir));
    } else {
        log_operation_complete("found", dir, files.len(), "files", None);
    }

    Ok(files)
}

/// Read a CSV or Parquet file into record batches
pub fn read_record_batches(path: &Path) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading", path);

    let batches = match InputFormat::from_path(path) {
        Some(InputFormat::Csv) => read_csv(path)?,
        Some(InputFormat::Parquet) => read_parquet(path)?,
        None => {
            return Err(AkiError::path_error(
                "Unsupported input format (expected .csv or .parquet)",
                path,
            ));
        }
    };

    let rows = batches.iter().map(RecordBatch::num_rows).sum::<usize>();
    log_operation_complete("read", path, rows, "rows", Some(start.elapsed()));
    Ok(batches)
}

fn read_csv(path: &Path) -> Result<Vec<RecordBatch>> {
    let mut file = safe_open_file(path, "reading CSV input")?;

    // Header only; every column is read as text
    let format = Format::default().with_header(true);
    let (header, _) = format.infer_schema(&mut file, Some(0))?;
    file.seek(SeekFrom::Start(0))?;

    let schema = Schema::new(
        header
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    );

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_format(format)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)?;

    Ok(reader.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    let file: File = safe_open_file(path, "reading Parquet input")?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build()?;

    Ok(reader.collect::<std::result::Result<Vec<_>, _>>()?)
}
