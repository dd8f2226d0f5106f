//! Shared fixtures for integration tests
//!
//! The three reference patients cover a severely impaired baseline with no
//! value on the admission date, a mild impairment with one, and a normal
//! baseline followed by a sharp rise.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use aki_reader::{AdmissionWindow, CreatinineSeries, Demographics, Gender, Race};
use chrono::NaiveDate;

/// Parse an ISO date in a fixture
#[must_use]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Assert that a derived value is defined and within 1e-9 of `expected`
pub fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got undefined"));
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// A patient with demographics and a full creatinine history
pub struct ReferencePatient {
    pub id: &'static str,
    pub age: u32,
    pub gender: Gender,
    pub gender_code: &'static str,
    pub admission: &'static str,
    pub discharge: &'static str,
    pub labs: &'static [(&'static str, f64)],
}

impl ReferencePatient {
    #[must_use]
    pub fn window(&self) -> AdmissionWindow {
        AdmissionWindow::new(date(self.admission), date(self.discharge))
    }

    #[must_use]
    pub fn demographics(&self) -> Demographics {
        Demographics::new(self.id, self.age, self.gender, Race::Other, self.window())
    }

    #[must_use]
    pub fn series(&self) -> CreatinineSeries {
        self.labs.iter().map(|(d, v)| (date(d), *v)).collect()
    }
}

pub const PATIENT_1: ReferencePatient = ReferencePatient {
    id: "1",
    age: 55,
    gender: Gender::Male,
    gender_code: "M",
    admission: "2014-04-01",
    discharge: "2014-04-04",
    labs: PATIENT_1_LABS,
};

pub const PATIENT_2: ReferencePatient = ReferencePatient {
    id: "2",
    age: 64,
    gender: Gender::Female,
    gender_code: "F",
    admission: "2014-08-04",
    discharge: "2014-08-08",
    labs: PATIENT_2_LABS,
};

pub const PATIENT_3: ReferencePatient = ReferencePatient {
    id: "3",
    age: 43,
    gender: Gender::Male,
    gender_code: "M",
    admission: "2014-11-29",
    discharge: "2014-11-30",
    labs: PATIENT_3_LABS,
};

pub const REFERENCE_PATIENTS: [&ReferencePatient; 3] = [&PATIENT_1, &PATIENT_2, &PATIENT_3];

/// Write `Demographics.csv` and one lab file per patient into `dir`
pub fn write_input_dir(dir: &Path) {
    let mut demographics = String::from("MRN,Age,Gender,Race,AdmissionDate,DischargeDate\n");
    for patient in REFERENCE_PATIENTS {
        writeln!(
            demographics,
            "{},{},{},C,{},{}",
            patient.id, patient.age, patient.gender_code, patient.admission, patient.discharge
        )
        .unwrap();

        let mut labs = String::from("MRN,Creatinine,Date\n");
        for (d, v) in patient.labs {
            writeln!(labs, "{},{v},{d}", patient.id).unwrap();
        }
        fs::write(dir.join(format!("Labs{}.csv", patient.id)), labs).unwrap();
    }
    fs::write(dir.join("Demographics.csv"), demographics).unwrap();
}

/// Creatinine history of reference patient 1
pub const PATIENT_1_LABS: &[(&str, f64)] = &[
    ("2009-02-02", 1.8), ("2009-06-30", 2.2), ("2009-07-01", 2.0), ("2009-10-15", 2.8),
    ("2010-01-13", 3.0), ("2010-11-08", 3.3), ("2010-11-09", 3.4), ("2010-11-10", 3.4),
    ("2010-11-12", 3.5), ("2010-11-13", 3.7), ("2010-11-14", 4.0), ("2010-11-15", 3.7),
    ("2010-11-16", 3.7), ("2010-11-17", 3.9), ("2010-11-18", 4.1), ("2010-11-19", 4.0),
    ("2010-11-20", 3.8), ("2010-11-21", 3.9), ("2010-11-22", 3.9), ("2010-11-23", 4.1),
    ("2010-11-24", 3.9), ("2010-11-25", 3.9), ("2010-11-26", 4.3), ("2010-11-27", 4.5),
    ("2010-11-28", 4.8), ("2010-11-29", 5.0), ("2010-11-30", 5.2), ("2010-12-01", 5.0),
    ("2010-12-16", 3.8), ("2011-01-19", 4.2), ("2011-05-02", 4.7), ("2011-06-01", 5.1),
    ("2011-06-23", 4.6), ("2011-07-07", 5.2), ("2011-08-16", 5.2), ("2011-09-22", 4.9),
    ("2011-10-24", 4.7), ("2011-11-23", 4.7), ("2011-12-21", 5.1), ("2012-01-03", 4.6),
    ("2012-01-04", 5.5), ("2012-01-05", 5.5), ("2012-01-06", 5.3), ("2012-01-07", 5.3),
    ("2012-01-09", 5.9), ("2012-01-11", 6.1), ("2012-01-13", 6.1), ("2012-01-16", 6.1),
    ("2012-01-18", 6.0), ("2012-02-06", 5.9), ("2012-03-07", 6.8), ("2012-04-10", 6.3),
    ("2012-05-01", 7.0), ("2012-05-02", 6.9), ("2012-05-14", 7.9), ("2012-06-11", 7.9),
    ("2012-06-25", 6.8), ("2012-06-27", 6.3), ("2012-06-28", 6.4), ("2012-06-29", 6.6),
    ("2012-06-30", 6.9), ("2012-07-01", 6.6), ("2012-07-02", 7.0), ("2012-07-09", 7.7),
    ("2012-07-18", 7.5), ("2012-08-28", 8.3), ("2012-09-20", 6.8), ("2012-10-18", 6.9),
    ("2012-11-15", 6.6), ("2012-12-20", 6.8), ("2013-01-17", 6.6), ("2013-02-21", 6.9),
    ("2013-03-21", 6.9), ("2013-04-18", 7.0), ("2013-05-16", 6.5), ("2013-06-20", 8.0),
    ("2013-07-18", 8.3), ("2013-08-22", 8.2), ("2013-09-19", 8.7), ("2013-10-17", 8.5),
    ("2013-11-21", 8.0), ("2013-12-19", 8.1), ("2014-01-23", 7.6), ("2014-02-20", 8.4),
    ("2014-03-20", 8.9), ("2014-04-02", 7.3), ("2014-04-03", 9.5), ("2014-04-04", 6.8),
    ("2014-04-17", 9.5), ("2014-05-22", 8.2), ("2014-06-19", 8.0), ("2014-07-17", 8.2),
    ("2014-08-21", 8.5), ("2014-09-18", 8.4), ("2014-10-16", 7.6), ("2014-11-20", 8.1),
    ("2014-12-18", 9.5),
];

/// Creatinine history of reference patient 2
pub const PATIENT_2_LABS: &[(&str, f64)] = &[
    ("2009-09-30", 0.9), ("2010-01-29", 0.8), ("2010-11-24", 0.9), ("2011-03-03", 0.9),
    ("2012-06-13", 0.8), ("2012-06-14", 0.8), ("2012-06-15", 1.1), ("2012-06-16", 0.8),
    ("2012-06-17", 0.8), ("2012-06-18", 0.8), ("2012-06-19", 1.0), ("2012-06-20", 1.0),
    ("2012-06-21", 0.7), ("2012-06-22", 0.7), ("2012-06-23", 0.7), ("2012-06-24", 0.7),
    ("2012-06-25", 0.6), ("2012-06-30", 0.6), ("2012-07-01", 0.6), ("2012-07-02", 0.7),
    ("2012-07-03", 0.6), ("2012-07-05", 0.6), ("2012-07-06", 0.6), ("2012-08-02", 0.7),
    ("2012-09-27", 0.9), ("2012-12-20", 0.9), ("2013-03-14", 1.0), ("2013-07-25", 1.0),
    ("2013-12-05", 0.9), ("2014-03-06", 0.9), ("2014-04-10", 0.8), ("2014-07-17", 0.8),
    ("2014-08-04", 0.9), ("2014-08-06", 0.6), ("2014-08-08", 0.6), ("2014-08-26", 0.6),
    ("2014-09-25", 0.6), ("2014-10-01", 0.6),
];

/// Creatinine history of reference patient 3
pub const PATIENT_3_LABS: &[(&str, f64)] = &[
    ("2012-06-26", 1.2), ("2012-07-16", 1.1), ("2012-08-08", 1.1), ("2012-08-24", 1.1),
    ("2012-09-17", 1.1), ("2012-10-17", 1.1), ("2012-11-01", 1.0), ("2012-11-29", 1.1),
    ("2012-12-27", 0.9), ("2013-01-05", 1.0), ("2013-01-07", 0.8), ("2013-01-08", 0.9),
    ("2013-02-14", 0.8), ("2013-05-01", 1.2), ("2013-05-31", 0.9), ("2013-06-13", 0.9),
    ("2013-07-17", 1.1), ("2013-08-16", 1.1), ("2013-08-29", 0.9), ("2013-09-12", 0.9),
    ("2013-09-30", 0.9), ("2013-10-10", 1.2), ("2013-11-04", 1.1), ("2013-11-25", 1.1),
    ("2013-12-30", 1.0), ("2014-04-03", 1.0), ("2014-05-12", 1.1), ("2014-05-19", 1.2),
    ("2014-06-09", 1.0), ("2014-07-01", 0.8), ("2014-07-08", 1.0), ("2014-07-22", 0.9),
    ("2014-08-21", 0.9), ("2014-09-02", 1.0), ("2014-09-09", 0.9), ("2014-09-18", 1.0),
    ("2014-09-29", 0.9), ("2014-10-23", 0.9), ("2014-11-03", 0.8), ("2014-11-04", 0.7),
    ("2014-11-05", 0.8), ("2014-11-06", 0.8), ("2014-11-11", 0.9), ("2014-11-14", 2.0),
    ("2014-11-25", 3.1), ("2014-11-26", 3.3), ("2014-11-29", 4.0),
];
