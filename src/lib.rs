pub mod config;
pub mod logger;
pub mod error;
pub mod delay_manager;
pub mod extractor;
pub mod scraper;
pub mod store;
pub mod tag_list;
pub mod dataset;
pub mod aggregator;
pub mod dashboard;

// Exporting types for convenience
pub use config::ScraperConfig;
pub use error::{AggregateError, ScrapeError};
pub use extractor::{Extractor, Field, UNKNOWN};
pub use scraper::{HttpSource, PageSource, ScrapeSummary, Scraper};
pub use store::{JobRecord, RecordStore};
pub use dataset::{CategoryView, Dataset};
pub use dashboard::{CategoryReport, Panel};
