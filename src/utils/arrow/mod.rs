//! Arrow data handling utilities
//!
//! Locating columns in loosely typed input batches and extracting them as
//! plain Rust values.

pub mod array_utils;
pub mod extractors;

pub use array_utils::{cast_column, column_at, find_column};
pub use extractors::{extract_codes, extract_float64s, extract_strings};
