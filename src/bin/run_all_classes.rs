//! Run the decision table for every class and method
//!
//! Evaluates each (class, method) selection in parallel and writes one
//! combined CSV for review.

use anyhow::{Context, Result};
use clap::Parser;
use claims_flightpath::{
    analysis::Driver,
    dataset::loader::DEFAULT_DATASET_PATH,
    report::DecisionCsvWriter,
    load_dataset, AnalysisConfig, Dashboard,
};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_all_classes", about = "Decision tables for every class and method")]
struct Args {
    #[arg(long, default_value = DEFAULT_DATASET_PATH)]
    data: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = claims_flightpath::config::DEFAULT_QUALITY_THRESHOLD)]
    threshold: f64,

    #[arg(long, default_value = "decision_tables.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let dataset = load_dataset(&args.data)
        .with_context(|| format!("loading dataset {}", args.data.display()))?;
    println!("Loaded {} records in {:?}", dataset.records.len(), start.elapsed());

    let dashboard = Dashboard::new(dataset, config);
    let tables = dashboard.decision_tables(args.threshold)?;
    println!("Evaluated {} class/method tables in {:?}", tables.len(), start.elapsed());

    let file = File::create(&args.output).with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = DecisionCsvWriter::new(file);
    let mut drivers: BTreeMap<&str, usize> = BTreeMap::new();
    for table in &tables {
        writer.write_rows(&table.class, &table.method, &table.rows)?;
        for row in &table.rows {
            *drivers.entry(row.driver.map_or("(no signal)", |d: Driver| d.label())).or_default() += 1;
        }
    }
    writer.finish()?;
    println!("Output written to {}", args.output.display());

    println!("\nDriver summary:");
    for (driver, count) in &drivers {
        println!("  {:<20} {:>5}", driver, count);
    }
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
