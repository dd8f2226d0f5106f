//! CKD-EPI estimated glomerular filtration rate and CKD staging
//!
//! ```text
//! eGFR = 141 × min(Scr/κ, 1)^α × max(Scr/κ, 1)^-1.209 × 0.993^age × g × r
//! ```
//!
//! * `Scr` is serum creatinine in mg/dL
//! * κ is 0.7 for females and 0.9 for males
//! * α is -0.329 for females and -0.411 for males
//! * g is 1.018 for females and 1 for males
//! * r is 1.159 for black patients and 1 otherwise

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::types::{Gender, Race, RawCode};

const SCALE: f64 = 141.0;
const UPPER_EXPONENT: f64 = -1.209;
const AGE_BASE: f64 = 0.993;
const BLACK_FACTOR: f64 = 1.159;

/// Gender-specific constants `(κ, α, g)`
const fn gender_constants(gender: Gender) -> (f64, f64, f64) {
    match gender {
        Gender::Male => (0.9, -0.411, 1.0),
        Gender::Female => (0.7, -0.329, 1.018),
    }
}

const fn race_factor(race: Race) -> f64 {
    match race {
        Race::Black => BLACK_FACTOR,
        Race::Other => 1.0,
    }
}

/// CKD-EPI eGFR (mL/min/1.73m²) for normalized demographics
#[must_use]
pub fn ckd_epi(creatinine: f64, age: u32, gender: Gender, race: Race) -> f64 {
    let (k, alpha, g) = gender_constants(gender);
    let ratio = creatinine / k;

    SCALE
        * ratio.min(1.0).powf(alpha)
        * ratio.max(1.0).powf(UPPER_EXPONENT)
        * AGE_BASE.powf(f64::from(age))
        * g
        * race_factor(race)
}

/// CKD-EPI eGFR from raw input encodings.
///
/// Race values outside the recognized encodings fall back to the non-black
/// coefficient. Gender values are not defaulted.
///
/// # Errors
/// Returns `AkiError::InvalidGender` when `gender` is neither male nor female.
pub fn estimate(creatinine: f64, age: u32, gender: &RawCode, race: &RawCode) -> Result<f64> {
    let gender = Gender::try_from(gender)?;
    Ok(ckd_epi(creatinine, age, gender, Race::from(race)))
}

/// Chronic kidney disease stage derived from eGFR
///
/// Stage 1 (eGFR ≥ 90) is not labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CkdStage {
    /// 60 ≤ eGFR < 90
    Stage2 = 2,
    /// 30 ≤ eGFR < 60
    Stage3 = 3,
    /// 15 ≤ eGFR < 30
    Stage4 = 4,
    /// eGFR < 15
    Stage5 = 5,
}

impl CkdStage {
    /// Classify an eGFR value; undefined or normal filtration yields `None`
    #[must_use]
    pub fn from_egfr(egfr: Option<f64>) -> Option<Self> {
        let egfr = egfr.filter(|v| !v.is_nan())?;
        if egfr < 15.0 {
            Some(Self::Stage5)
        } else if egfr < 30.0 {
            Some(Self::Stage4)
        } else if egfr < 60.0 {
            Some(Self::Stage3)
        } else if egfr < 90.0 {
            Some(Self::Stage2)
        } else {
            None
        }
    }

    /// Numeric stage (2-5)
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CkdStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
