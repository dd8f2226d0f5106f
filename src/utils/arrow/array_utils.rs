//! Utilities for working with Arrow arrays.
//!
//! Input files are read with inferred schemas, so the same logical column may
//! arrive as integers, floats, strings or dates depending on its contents.
//! Columns are located by name or position and cast to the type the caller
//! needs.

use arrow::array::ArrayRef;
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{AkiError, Result};

/// Find a column index by name, ignoring ASCII case and surrounding spaces
pub fn find_column(batch: &RecordBatch, column_name: &str) -> Result<usize> {
    batch
        .schema()
        .fields()
        .iter()
        .position(|f| f.name().trim().eq_ignore_ascii_case(column_name))
        .ok_or_else(|| AkiError::MissingColumn(column_name.to_string()))
}

/// Get a column by position, failing if the batch is too narrow
pub fn column_at(batch: &RecordBatch, index: usize) -> Result<&ArrayRef> {
    if index >= batch.num_columns() {
        return Err(AkiError::Schema(format!(
            "expected at least {} columns, found {}",
            index + 1,
            batch.num_columns()
        )));
    }
    Ok(batch.column(index))
}

/// Cast a column to `expected_type` unless it already has that type.
///
/// Values that cannot be represented become nulls rather than errors.
pub fn cast_column(column: &ArrayRef, expected_type: &DataType) -> Result<ArrayRef> {
    if column.data_type() == expected_type {
        return Ok(column.clone());
    }
    log::debug!(
        "Converting column from {:?} to {expected_type:?}",
        column.data_type()
    );
    Ok(cast(column, expected_type)?)
}
