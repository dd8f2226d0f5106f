//! Module for handling date parsing.
//!
//! Lab exports carry dates in whatever format the source system used, with or
//! without a time of day. Only the calendar date is kept.

use chrono::{NaiveDate, NaiveDateTime};

/// Configuration for date format handling
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// List of date-time format strings whose date part is kept
    pub datetime_formats: Vec<String>,
    /// Enable heuristic format detection
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%d-%m-%Y".to_string(), // European: 15-01-2023
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%d.%m.%Y".to_string(), // German/Danish: 15.01.2023
                "%Y%m%d".to_string(),   // Compact: 20230115
                "%d %b %Y".to_string(), // 15 Jan 2023
                "%d %B %Y".to_string(), // 15 January 2023
            ],
            datetime_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
                "%m/%d/%Y %H:%M".to_string(),
                "%m/%d/%Y %H:%M:%S".to_string(),
            ],
            enable_format_detection: true,
        }
    }
}

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    for format in &config.datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime.date());
        }
    }

    // Fractional seconds and other trailing time parts
    if let Some(prefix) = s.get(..10) {
        if s.len() > 10 && matches!(s.as_bytes()[10], b' ' | b'T') {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(date);
            }
        }
    }

    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, detected_format) {
                return Some(date);
            }
        }
    }

    None
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<&'static str> {
    // YYYY-MM-DD
    if s.len() == 10 && s.chars().nth(4) == Some('-') && s.chars().nth(7) == Some('-') {
        return Some("%Y-%m-%d");
    }

    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() == 4 {
                return Some("%Y/%m/%d");
            } else if parts[2].len() == 4 {
                if let Ok(first_num) = parts[0].parse::<u8>() {
                    if first_num > 12 {
                        return Some("%d/%m/%Y");
                    }
                    return Some("%m/%d/%Y");
                }
            }
        }
    }

    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[2].len() == 4 {
            return Some("%d.%m.%Y");
        }
    }

    None
}
