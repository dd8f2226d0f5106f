//! Algorithm implementations for AKI metrics
//!
//! This module contains the eGFR equation and CKD staging, the window
//! statistics, per-patient timeline construction and the parallel batch
//! driver that ties them together.

pub mod batch;
pub mod egfr;
pub mod statistics;
pub mod timeline;

pub use batch::{BatchSummary, TimelineCollection, build_timelines, run_batch};
pub use egfr::{CkdStage, ckd_epi, estimate};
pub use statistics::BaselineStatistic;
pub use timeline::{PatientTimeline, TimelineMetrics, TrendSeries};
