//! Generate the synthetic dashboard dataset
//!
//! Writes dashboard-ready JSON (default data/analytics.json) and optionally the
//! long-format development records as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use claims_flightpath::dataset::{generate_dataset, loader::DEFAULT_DATASET_PATH, GeneratorConfig};
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "generate_data", about = "Generate dummy reserving data for the flight path dashboard")]
struct Args {
    /// Output JSON path
    #[arg(long, default_value = DEFAULT_DATASET_PATH)]
    output: PathBuf,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Valuation quarter (YYYYQn)
    #[arg(long, default_value = "2026Q1")]
    valuation_date: String,

    /// Also write long-format records to this CSV file
    #[arg(long)]
    records_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = GeneratorConfig {
        seed: args.seed,
        valuation_date: args.valuation_date,
        ..Default::default()
    };
    let dataset = generate_dataset(&config)?;

    // Preview
    println!("{:<10} {:<8} {:>4} {:<9} {:>14}", "Class", "Cohort", "DP", "Type", "Value");
    for record in dataset.records.iter().take(20) {
        println!(
            "{:<10} {:<8} {:>4} {:<9} {:>14.2}",
            record.class,
            record.cohort,
            record.development_period,
            format!("{:?}", record.record_type),
            record.value
        );
    }
    println!("\nTotal rows : {}", dataset.records.len());
    println!("Classes    : {:?}", dataset.classes);
    println!("Methods    : {:?}", dataset.methods);
    println!("Claims     : {}", dataset.claims.len());
    println!();

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&dataset)?;
    fs::write(&args.output, json).with_context(|| format!("writing {}", args.output.display()))?;
    println!("Wrote {} records to {}", dataset.records.len(), args.output.display());

    if let Some(path) = &args.records_csv {
        let mut writer = csv::Writer::from_writer(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        );
        for record in &dataset.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        println!("Wrote long-format records to {}", path.display());
    }

    Ok(())
}
