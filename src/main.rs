use std::path::PathBuf;
use std::time::Instant;

use aki_reader::{BatchConfig, run_batch};
use anyhow::Context;
use log::info;

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = BatchConfig::from_env().context("Invalid configuration")?;

    // Positional arguments override the environment: [INPUT_DIR] [OUTPUT_DIR]
    let mut args = std::env::args().skip(1);
    if let Some(input_dir) = args.next() {
        config.input_dir = PathBuf::from(input_dir);
    }
    if let Some(output_dir) = args.next() {
        config.output_dir = PathBuf::from(output_dir);
    }

    let start = Instant::now();
    let (timelines, summary) = run_batch(&config).with_context(|| {
        format!(
            "Batch run failed for input directory {}",
            config.input_dir.display()
        )
    })?;

    println!("{}", timelines.summary());
    info!(
        "{} of {} patients have an eGFR ({} demographics rows, {} lab files)",
        summary.patients_with_egfr, summary.patients, summary.demographics_rows, summary.lab_files
    );
    for (stage, count) in timelines.stage_counts() {
        match stage {
            Some(stage) => info!("  CKD stage {stage}: {count}"),
            None => info!("  Not staged: {count}"),
        }
    }
    info!(
        "Wrote results to {} in {:?}",
        config.output_dir.display(),
        start.elapsed()
    );

    Ok(())
}
