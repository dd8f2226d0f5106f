//! Utility functions for error handling
//!
//! Opening input files and checking directories with messages that say which
//! path failed and why.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{AkiError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(AkiError::path_error(
            format!("File not found (needed for: {purpose})"),
            path,
        ));
    }

    if !path.is_file() {
        return Err(AkiError::path_error(
            format!("Path is not a file (expected a file for: {purpose})"),
            path,
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            io::ErrorKind::NotFound => {
                "File not found - it may have been deleted during operation".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        AkiError::path_error_with_source(context, path, e)
    })
}

/// Check if a directory exists and is readable, with rich error information
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(AkiError::path_error(
            format!("Directory not found (needed for: {purpose})"),
            path,
        ));
    }

    if !path.is_dir() {
        return Err(AkiError::path_error(
            format!("Path is not a directory (expected a directory for: {purpose})"),
            path,
        ));
    }

    match fs::read_dir(path) {
        Ok(_) => Ok(()),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check directory permissions".to_string()
                }
                _ => format!("Failed to access directory for: {purpose}"),
            };
            Err(AkiError::path_error_with_source(context, path, e))
        }
    }
}

/// Create a directory (and parents) for writing output
pub fn ensure_output_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        AkiError::path_error_with_source("Failed to create output directory", path, e)
    })
}
