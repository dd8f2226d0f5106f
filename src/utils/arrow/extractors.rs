//! Column extraction utilities for Arrow record batches
//!
//! Whole columns are pulled out at once as plain Rust values so the loaders
//! can work row by row without touching Arrow types.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type};

use crate::error::Result;
use crate::models::types::RawCode;
use crate::utils::arrow::array_utils::cast_column;

/// Extract a column as optional strings (nulls and empty cells become `None`)
pub fn extract_strings(column: &ArrayRef) -> Result<Vec<Option<String>>> {
    let cast = cast_column(column, &DataType::Utf8)?;
    let strings = cast.as_string::<i32>();

    Ok((0..strings.len())
        .map(|row| {
            if strings.is_null(row) {
                return None;
            }
            let value = strings.value(row).trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect())
}

/// Extract a column as optional floats; NaN and unparseable cells become `None`
pub fn extract_float64s(column: &ArrayRef) -> Result<Vec<Option<f64>>> {
    let cast = cast_column(column, &DataType::Float64)?;
    let floats = cast.as_primitive::<Float64Type>();

    Ok((0..floats.len())
        .map(|row| {
            if floats.is_null(row) {
                return None;
            }
            let value = floats.value(row);
            (!value.is_nan()).then_some(value)
        })
        .collect())
}

/// Extract a categorical column as raw codes
pub fn extract_codes(column: &ArrayRef) -> Result<Vec<RawCode>> {
    Ok(extract_strings(column)?
        .into_iter()
        .map(|value| value.map_or(RawCode::Missing, |s| RawCode::parse(&s)))
        .collect())
}
