use reqwest::StatusCode;
use thiserror::Error;

pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
pub type AggregateResult<T> = std::result::Result<T, AggregateError>;

/// Failures of a scraping session.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    HttpStatus { url: String, status: StatusCode },
    #[error("could not build HTTP client: {0}")]
    Client(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// True for transport failures and non-success responses.
    pub fn is_network(&self) -> bool {
        matches!(self, ScrapeError::Network(_) | ScrapeError::HttpStatus { .. })
    }
}

/// Failures while loading or aggregating the processed dataset.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("row {row}, column '{column}': cannot decode {value:?} as a tag list ({reason})")]
    Decode {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },
    #[error("dataset has no '{0}' column")]
    MissingColumn(String),
    #[error("insufficient data for '{column}' in category '{category}'")]
    EmptyPopulation { category: String, column: String },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AggregateError {
    /// The "no data for this category" signal the presentation layer renders
    /// instead of a chart.
    pub fn is_no_data(&self) -> bool {
        matches!(self, AggregateError::EmptyPopulation { .. })
    }
}
