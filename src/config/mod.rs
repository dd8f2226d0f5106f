//! Configuration for timeline construction and batch runs.

use std::fmt;
use std::path::PathBuf;

use crate::algorithm::statistics::BaselineStatistic;
use crate::error::{AkiError, Result};
use crate::utils::date::DateFormatConfig;

/// Default width of the pre-admission baseline window, in days
pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;

/// Configuration for building a patient timeline
#[derive(Debug, Clone, Copy)]
pub struct TimelineConfig {
    /// Width of the pre-admission baseline window in days
    pub lookback_days: i64,
    /// How the baseline is derived from the pre-admission window
    pub baseline_statistic: BaselineStatistic,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            baseline_statistic: BaselineStatistic::Median,
        }
    }
}

impl TimelineConfig {
    /// Set the lookback window width
    #[must_use]
    pub const fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Set the baseline statistic
    #[must_use]
    pub const fn with_baseline_statistic(mut self, statistic: BaselineStatistic) -> Self {
        self.baseline_statistic = statistic;
        self
    }
}

impl fmt::Display for TimelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "baseline = {} of values in the {} days before admission",
            self.baseline_statistic, self.lookback_days
        )
    }
}

/// Configuration for a batch run over input files
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory holding the demographics and lab files
    pub input_dir: PathBuf,
    /// Directory receiving the AKI table and trend files
    pub output_dir: PathBuf,
    /// Demographics file name inside `input_dir`
    pub demographics_file: String,
    /// Lab files are those whose name starts with this prefix
    pub lab_file_prefix: String,
    /// Whether per-patient trend files are written
    pub write_trends: bool,
    /// Worker threads used to build timelines
    pub num_threads: usize,
    /// Timeline settings
    pub timeline: TimelineConfig,
    /// Accepted date formats
    pub date_format_config: DateFormatConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Input"),
            output_dir: PathBuf::from("Output"),
            demographics_file: "Demographics.csv".to_string(),
            lab_file_prefix: "Labs".to_string(),
            write_trends: true,
            num_threads: num_cpus::get(),
            timeline: TimelineConfig::default(),
            date_format_config: DateFormatConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Defaults overridden by `AKI_INPUT_DIR`, `AKI_OUTPUT_DIR`,
    /// `AKI_LOOKBACK_DAYS`, `AKI_BASELINE_STATISTIC` and `AKI_THREADS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BatchConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("AKI_INPUT_DIR") {
            config.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("AKI_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(days) = lookup("AKI_LOOKBACK_DAYS") {
            let days = days
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|d| *d > 0)
                .ok_or_else(|| AkiError::Config(format!("Invalid AKI_LOOKBACK_DAYS: {days}")))?;
            config.timeline.lookback_days = days;
        }
        if let Some(statistic) = lookup("AKI_BASELINE_STATISTIC") {
            config.timeline.baseline_statistic = statistic.parse()?;
        }
        if let Some(threads) = lookup("AKI_THREADS") {
            config.num_threads = threads
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|t| *t > 0)
                .ok_or_else(|| AkiError::Config(format!("Invalid AKI_THREADS: {threads}")))?;
        }

        Ok(config)
    }

    /// Full path of the demographics file
    #[must_use]
    pub fn demographics_path(&self) -> PathBuf {
        self.input_dir.join(&self.demographics_file)
    }
}

impl fmt::Display for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Batch Configuration:")?;
        writeln!(f, "  Input Directory: {}", self.input_dir.display())?;
        writeln!(f, "  Output Directory: {}", self.output_dir.display())?;
        writeln!(f, "  Demographics File: {}", self.demographics_file)?;
        writeln!(f, "  Lab File Prefix: {}", self.lab_file_prefix)?;
        writeln!(f, "  Write Trends: {}", self.write_trends)?;
        writeln!(f, "  Threads: {}", self.num_threads)?;
        writeln!(f, "  Timeline: {}", self.timeline)
    }
}
