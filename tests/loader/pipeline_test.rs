//! End-to-end tests: input directory in, AKI table and trend files out

use std::fs;

use aki_reader::{BatchConfig, load_labs, run_batch, utils::DateFormatConfig, utils::find_input_files};
use tempfile::TempDir;

use crate::utils::write_input_dir;

fn config_for(input: &TempDir, output: &TempDir) -> BatchConfig {
    BatchConfig {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().join("Output"),
        num_threads: 2,
        ..BatchConfig::default()
    }
}

#[test]
fn test_run_batch_writes_outputs() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input_dir(input.path());

    let config = config_for(&input, &output);
    let (timelines, summary) = run_batch(&config).unwrap();

    assert_eq!(summary.lab_files, 3);
    assert_eq!(summary.demographics_rows, 3);
    assert_eq!(summary.patients, 3);
    assert_eq!(summary.observations, 182);
    assert_eq!(summary.patients_with_egfr, 3);
    assert_eq!(timelines.patient_count(), 3);

    let table = fs::read_to_string(config.output_dir.join("AKI.csv")).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "MRN,baseCr,minCr,25Cr,peakCr,eGFR,CKD");
    assert!(lines[1].starts_with("1,8.25,7.6,8.025,9.5,"));
    assert!(lines[1].ends_with(",5"));
    assert!(lines[2].starts_with("2,0.8,0.8,0.8,0.9,"));
    // Third patient is not staged
    assert!(lines[3].starts_with("3,0.9,0.7,"));
    assert!(lines[3].ends_with(','));

    let trends = config.output_dir.join("Trends");
    for id in ["1", "2", "3"] {
        assert!(trends.join(format!("{id}.csv")).is_file());
    }
    let trend = fs::read_to_string(trends.join("2.csv")).unwrap();
    assert_eq!(trend.lines().count(), 39);
}

#[test]
fn test_run_batch_without_demographics() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input_dir(input.path());
    fs::remove_file(input.path().join("Demographics.csv")).unwrap();

    let mut config = config_for(&input, &output);
    config.write_trends = false;
    let (timelines, summary) = run_batch(&config).unwrap();

    assert_eq!(summary.demographics_rows, 0);
    assert_eq!(summary.patients, 3);
    assert_eq!(summary.patients_with_egfr, 0);
    assert!(timelines.iter().all(|t| t.baseline_cr().is_none()));

    let table = fs::read_to_string(config.output_dir.join("AKI.csv")).unwrap();
    assert!(table.lines().skip(1).all(|line| line.ends_with(",,,,,,")));
    assert!(!config.output_dir.join("Trends").exists());
}

#[test]
fn test_missing_input_directory_is_an_error() {
    let output = TempDir::new().unwrap();
    let config = BatchConfig {
        input_dir: output.path().join("nowhere"),
        output_dir: output.path().join("Output"),
        ..BatchConfig::default()
    };
    assert!(run_batch(&config).is_err());
}

#[test]
fn test_lab_file_discovery_order() {
    let input = TempDir::new().unwrap();
    write_input_dir(input.path());
    fs::write(input.path().join("notes.txt"), "ignored").unwrap();

    let files = find_input_files(input.path(), "Labs").unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Labs1.csv", "Labs2.csv", "Labs3.csv"]);

    let labs = load_labs(&files, &DateFormatConfig::default()).unwrap();
    assert_eq!(labs.values().map(|s| s.len()).sum::<usize>(), 182);
}
