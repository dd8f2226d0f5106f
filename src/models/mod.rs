//! Domain models
//!
//! Creatinine observations, demographics and the categorical types shared by
//! the loaders and the timeline algorithms.

pub mod demographics;
pub mod observation;
pub mod types;

pub use demographics::{
    AdmissionWindow, Demographics, DemographicsRecord, DemographicsTable, PatientId,
    normalize_patient_id,
};
pub use observation::{CreatinineObservation, CreatinineSeries};
pub use types::{Gender, Race, RawCode};
