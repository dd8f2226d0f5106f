//! Error handling for creatinine timeline analysis.
//!
//! Absent statistics (an empty baseline window, a missing admission-day value)
//! are not errors: they are carried as `None` on the timeline. The variants
//! below cover malformed input and failed I/O only.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for AKI analysis
#[derive(Debug, thiserror::Error)]
pub enum AkiError {
    /// Gender value not recognized by any accepted encoding
    #[error("equation undefined for gender: {0}")]
    InvalidGender(String),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// IO error annotated with the offending path and a reason
    #[error("{message}: {}", .path.display())]
    PathError {
        /// What went wrong
        message: String,
        /// File or directory involved
        path: PathBuf,
        /// Underlying IO failure, if any
        #[source]
        source: Option<io::Error>,
    },

    /// Error processing Arrow data (CSV reading, casts, batch assembly)
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// A required input column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Input has an unexpected layout
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AkiError {
    /// Create a path error without an underlying IO source
    pub fn path_error(message: impl Into<String>, path: &Path) -> Self {
        Self::PathError {
            message: message.into(),
            path: path.to_path_buf(),
            source: None,
        }
    }

    /// Create a path error wrapping an IO failure
    pub fn path_error_with_source(message: impl Into<String>, path: &Path, source: io::Error) -> Self {
        Self::PathError {
            message: message.into(),
            path: path.to_path_buf(),
            source: Some(source),
        }
    }
}

impl From<serde_arrow::Error> for AkiError {
    fn from(error: serde_arrow::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for AKI analysis operations
pub type Result<T> = std::result::Result<T, AkiError>;
