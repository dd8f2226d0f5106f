//! Common domain type definitions
//!
//! Demographic categories arrive in several encodings (full words, single
//! letters, integer codes). They are normalized here, at the input boundary,
//! into closed enums so the timeline and the eGFR equation only ever see
//! `Gender` and `Race`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AkiError, Result};

/// A categorical value as it appears in an input file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RawCode {
    /// Free-text encoding such as `"MALE"` or `"F"`
    Text(String),
    /// Integer encoding such as `1` or `2`
    Number(i64),
    /// Empty cell or no demographics row at all
    #[default]
    Missing,
}

impl RawCode {
    /// Interpret a cell read as text. Integer-looking strings become `Number`,
    /// blank strings become `Missing`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Number(n);
        }
        // "1.0" from a float column
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 {
                return Self::Number(f as i64);
            }
        }
        Self::Text(trimmed.to_string())
    }
}

impl From<&str> for RawCode {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<i64> for RawCode {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Missing => write!(f, "<missing>"),
        }
    }
}

/// Gender of a patient, as far as the CKD-EPI equation is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male gender
    Male,
    /// Female gender
    Female,
}

impl Gender {
    /// Upper-case label used in summaries
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }
}

impl TryFrom<&RawCode> for Gender {
    type Error = AkiError;

    fn try_from(code: &RawCode) -> Result<Self> {
        match code {
            RawCode::Text(s) => match s.trim().to_uppercase().as_str() {
                "MALE" | "M" => Ok(Self::Male),
                "FEMALE" | "F" => Ok(Self::Female),
                _ => Err(AkiError::InvalidGender(s.clone())),
            },
            RawCode::Number(1) => Ok(Self::Male),
            RawCode::Number(2) => Ok(Self::Female),
            other => Err(AkiError::InvalidGender(other.to_string())),
        }
    }
}

impl FromStr for Gender {
    type Err = AkiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(&RawCode::parse(s))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Race category used by the CKD-EPI race coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Race {
    /// Black / African American
    Black,
    /// Any other or unrecognized value
    #[default]
    Other,
}

impl Race {
    /// Upper-case label used in summaries
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Black => "BLACK",
            Self::Other => "OTHER",
        }
    }
}

impl From<&RawCode> for Race {
    fn from(code: &RawCode) -> Self {
        match code {
            RawCode::Text(s) => match s.trim().to_uppercase().as_str() {
                "BLACK" | "B" | "AA" => Self::Black,
                _ => Self::Other,
            },
            RawCode::Number(1) => Self::Black,
            _ => Self::Other,
        }
    }
}

impl From<&str> for Race {
    fn from(s: &str) -> Self {
        Self::from(&RawCode::parse(s))
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
