use skill_scope_lib::{dashboard, logger, Dataset};

use std::error::Error;
use std::path::PathBuf;
use clap::Parser;
use log::info;

/// Prints per-category dashboard aggregations as JSON.
#[derive(Parser, Debug)]
#[command(name = "skill_scope_report")]
#[command(about = "Aggregates a processed job dataset per category", long_about = None)]
struct Cli {
    /// Processed dataset (.csv, .xlsx or .xls) with a Category column
    #[arg(short = 'd', long = "data", default_value = "data/processed/data_processed.csv")]
    data: PathBuf,

    /// Only report this category
    #[arg(short = 'c', long = "category")]
    category: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    let cli = Cli::parse();

    let dataset = Dataset::load(&cli.data)?;
    let reports = match &cli.category {
        Some(category) => vec![dashboard::build(&dataset, category)?],
        None => dashboard::build_all(&dataset)?,
    };

    for report in &reports {
        info!("{}", report.headline());
    }
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
