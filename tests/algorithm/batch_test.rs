//! Tests for building timelines across a batch of patients

use aki_reader::{
    AdmissionWindow, CkdStage, CreatinineSeries, Demographics, DemographicsTable, Gender,
    LabSeriesMap, Race, TimelineConfig, build_timelines,
};

use crate::utils::{PATIENT_3, REFERENCE_PATIENTS, assert_close, date};

fn reference_inputs() -> (DemographicsTable, LabSeriesMap) {
    let table: DemographicsTable = REFERENCE_PATIENTS.iter().map(|p| p.demographics()).collect();
    let labs: LabSeriesMap = REFERENCE_PATIENTS
        .iter()
        .map(|p| (p.id.to_string(), p.series()))
        .collect();
    (table, labs)
}

#[test]
fn test_reference_batch() {
    let (table, labs) = reference_inputs();
    let timelines = build_timelines(&table, labs, &TimelineConfig::default());

    assert_eq!(timelines.patient_count(), 3);
    assert_eq!(timelines.observation_count(), 97 + 38 + 47);
    assert_eq!(
        timelines.summary(),
        "Processed 3 patients, and 182 laboratory values"
    );

    let counts = timelines.stage_counts();
    assert_eq!(counts.get(&Some(CkdStage::Stage5)), Some(&1));
    assert_eq!(counts.get(&Some(CkdStage::Stage2)), Some(&1));
    assert_eq!(counts.get(&None), Some(&1));

    let rows = timelines.report_rows();
    let ids: Vec<&str> = rows.iter().map(|r| r.patient_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(rows[0].ckd_stage, Some(5));
    assert_close(rows[2].peak_cr, 4.0);
}

#[test]
fn test_batch_matches_single_patient_build() {
    let (table, labs) = reference_inputs();
    let timelines = build_timelines(&table, labs, &TimelineConfig::default());

    let single = aki_reader::PatientTimeline::build(
        PATIENT_3.id,
        Some(&PATIENT_3.demographics()),
        PATIENT_3.window(),
        PATIENT_3.series(),
        &TimelineConfig::default(),
    );
    assert_eq!(timelines.get("3").unwrap().metrics(), single.metrics());
}

#[test]
fn test_bad_rows_do_not_abort_batch() {
    let window = AdmissionWindow::new(date("2014-04-01"), date("2014-04-04"));
    let mut no_gender = Demographics::new("bad", 40, Gender::Male, Race::Black, window);
    no_gender.gender = None;
    let table: DemographicsTable = vec![no_gender].into_iter().collect();

    let mut labs = LabSeriesMap::new();
    labs.insert(
        "bad".to_string(),
        vec![(date("2014-03-01"), 1.1)].into_iter().collect::<CreatinineSeries>(),
    );
    labs.insert("empty".to_string(), CreatinineSeries::new());
    labs.insert(
        "orphan".to_string(),
        vec![(date("2014-03-01"), 1.3)].into_iter().collect::<CreatinineSeries>(),
    );

    let timelines = build_timelines(&table, labs, &TimelineConfig::default());
    assert_eq!(timelines.patient_count(), 2);

    let bad = timelines.get("bad").unwrap();
    assert_close(bad.baseline_cr(), 1.1);
    assert_eq!(bad.egfr(), None);
    assert_eq!(bad.ckd_stage(), None);
    // Empty in-admission window
    assert_eq!(bad.peak_cr(), None);

    assert!(timelines.get("empty").is_none());
    assert_eq!(timelines.get("orphan").unwrap().baseline_cr(), None);
}

#[test]
fn test_lookback_configuration() {
    let (table, labs) = reference_inputs();
    let config = TimelineConfig::default().with_lookback_days(30);
    let timelines = build_timelines(&table, labs, &config);

    // Only 2014-11-03 onwards remains in the third patient's window
    let third = timelines.get("3").unwrap();
    assert_eq!(third.pre_admission().len(), 8);
    assert_close(third.min_cr(), 0.7);
}

#[test]
fn test_oversized_lookback_does_not_abort_batch() {
    let (table, labs) = reference_inputs();
    let config = TimelineConfig::default().with_lookback_days(i64::MAX);
    let timelines = build_timelines(&table, labs, &config);

    assert_eq!(timelines.patient_count(), 3);
    // Every value before admission is in the baseline window
    let third = timelines.get("3").unwrap();
    assert_eq!(third.pre_admission().len(), 46);
    assert_close(third.min_cr(), 0.7);
}
