use skill_scope_lib::{logger, RecordStore, Scraper, ScraperConfig};

use std::error::Error;
use clap::Parser;
use log::{info, error};

/// Job Scraper
#[derive(Parser, Debug)]
#[command(name = "skill_scope")]
#[command(about = "Scrapes job postings for a keyword into a CSV file", long_about = None)]
struct Cli {
    /// Number of pages to scrape
    #[arg(short = 'p', long = "pages", default_value_t = 10)]
    pages: usize,

    /// Keyword for job search
    #[arg(short = 'k', long = "keyword")]
    keyword: String,

    /// Name of the CSV file to save the data
    #[arg(short = 'n', long = "name")]
    name: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    let cli = Cli::parse();
    info!("Scraping {} pages for '{}'", cli.pages, cli.keyword);

    let scraper = Scraper::from_config(ScraperConfig::from_env())?;
    let mut store = RecordStore::new();
    let output_csv = format!("{}.csv", cli.name);

    let outcome = scraper.scrape(&cli.keyword, cli.pages, &mut store);
    if let Err(e) = &outcome {
        error!("Scrape aborted after {} jobs: {}", store.len(), e);
    }

    // partial results are still written when the run aborts
    store.flush(&output_csv)?;
    outcome?;
    Ok(())
}
