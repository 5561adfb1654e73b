//! Claims Flight Path CLI
//!
//! Prints the method table and reserving decision table for one selection

use anyhow::{Context, Result};
use clap::Parser;
use claims_flightpath::{
    dataset::loader::DEFAULT_DATASET_PATH,
    report::{format_pct, DecisionCsvWriter},
    load_dataset, AnalysisConfig, Dashboard, ViewState,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "flightpath", version, about = "A vs E flight path analytics for claims development")]
struct Args {
    /// Dashboard dataset (JSON)
    #[arg(long, default_value = DEFAULT_DATASET_PATH)]
    data: PathBuf,

    /// Analysis configuration overrides (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Class of business (defaults to the first class)
    #[arg(long)]
    class: Option<String>,

    /// Reserving method (defaults to the best-quality method of the class)
    #[arg(long)]
    method: Option<String>,

    /// Projection quality threshold in [0, 1]
    #[arg(long, default_value_t = claims_flightpath::config::DEFAULT_QUALITY_THRESHOLD)]
    threshold: f64,

    /// Cohort to attribute movement for
    #[arg(long)]
    cohort: Option<String>,

    /// Print the full view as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Also write the decision table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let dataset = load_dataset(&args.data)
        .with_context(|| format!("loading dataset {} (run generate_data first?)", args.data.display()))?;
    let dashboard = Dashboard::new(dataset, config);

    let class = match args.class {
        Some(class) => class,
        None => dashboard
            .index()
            .classes()
            .next()
            .map(str::to_string)
            .context("dataset has no classes")?,
    };
    let method = match args.method {
        Some(method) => method,
        None => claims_flightpath::analysis::method_summaries(dashboard.index(), &class, args.threshold)
            .into_iter()
            .next()
            .map(|m| m.method)
            .with_context(|| format!("class {} has no scored methods", class))?,
    };

    let mut selection = ViewState::new(class, method).with_threshold(args.threshold);
    if let Some(cohort) = args.cohort {
        selection = selection.with_cohort(cohort);
    }
    let view = dashboard.view(&selection)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_tables(&view);
    }

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = DecisionCsvWriter::new(file);
        writer.write_rows(&selection.class, &selection.method, &view.decisions)?;
        writer.finish()?;
        println!("\nDecision table written to: {}", path.display());
    }

    Ok(())
}

fn print_tables(view: &claims_flightpath::DashboardView) {
    let selection = &view.selection;
    println!("Claims Flight Path v0.1.0");
    println!("=========================\n");
    println!("Class: {}  Method: {}  Quality threshold: {:.2}", selection.class, selection.method, selection.quality_threshold);
    println!();

    println!("Methods:");
    println!("{:<24} {:>8} {:>8} {:>6} {:>14} {:>10}", "Method", "Quality", "ResDet", "Pass", "Total Ult", "Chg");
    println!("{}", "-".repeat(76));
    for m in &view.methods {
        println!(
            "{:<24} {:>8.2} {:>8.2} {:>6} {:>14.0} {:>10}",
            m.method,
            m.projection_quality,
            m.reserve_determinism,
            if m.passes { "yes" } else { "-" },
            m.total_ultimate,
            m.total_change_pct.map_or("N/A".to_string(), |c| format!("{:+.1}%", c)),
        );
    }
    println!();

    println!("Reserving decisions:");
    println!("{:<8} {:>9} {:>9} {:>7} {:>7} {:>7} {:<20}", "Cohort", "AvsE", "UltChg", "ResDet", "Qual", "Fan", "Driver");
    println!("{}", "-".repeat(76));
    for row in &view.decisions {
        println!(
            "{:<8} {:>9} {:>9} {:>7} {:>7} {:>7} {:<20}",
            row.cohort,
            format_pct(row.ae_ratio),
            row.ultimate_change_pct.map_or("N/A".to_string(), |c| format!("{:+.1}%", c)),
            row.reserve_det_bucket.map_or("N/A", |b| b.label()),
            row.quality_bucket.map_or("N/A", |b| b.label()),
            if row.is_fanning_both { "yes" } else { "-" },
            row.driver_label(),
        );
        if !row.suggestion.is_empty() {
            println!("         -> {}", row.suggestion);
        }
    }

    if let Some(cohort) = &selection.selected_cohort {
        if let Some(a) = view.attributions.first() {
            println!("\nAttribution for {}:", cohort);
            println!("  Total movement:       {:>14.2} ({} claims)", a.total_movement, a.total_count);
            println!("  Large-loss movement:  {:>14.2} ({} claims)", a.large_loss_movement, a.large_loss_count);
            println!("  Attritional movement: {:>14.2} ({} claims)", a.attritional_movement, a.attritional_count);
            println!("  Large-loss share:     {:>13.1}%", a.large_pct);
        }
    }
}
