//! A Rust library for deriving acute kidney injury metrics from creatinine
//! laboratory values: pre-admission baseline, minimum and 25th percentile,
//! in-admission peak, CKD-EPI eGFR and CKD stage.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{BatchConfig, DEFAULT_LOOKBACK_DAYS, TimelineConfig};
pub use error::{AkiError, Result};
pub use models::{
    AdmissionWindow, CreatinineObservation, CreatinineSeries, Demographics, DemographicsTable,
    Gender, PatientId, Race, RawCode,
};

// Algorithms
pub use algorithm::{
    BaselineStatistic, BatchSummary, CkdStage, PatientTimeline, TimelineCollection,
    TimelineMetrics, TrendSeries, build_timelines, ckd_epi, estimate, run_batch,
};

// Input and output
pub use loader::{
    LabLoadStats, LabSeriesMap, load_demographics, load_demographics_if_present, load_labs,
    load_labs_with_stats,
};
pub use report::{AkiRow, write_aki_table, write_trend, write_trends};
