use std::fs::File;
use std::path::Path;
use log::info;
use serde::{Deserialize, Serialize};
use crate::error::ScrapeResult;

pub const HEADERS: [&str; 7] = [
    "Title",
    "Company",
    "Location",
    "Number of Applicants",
    "Experience",
    "Employment Type",
    "Description",
];

/// One scraped posting. Missing fields hold the `"Unknown"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Number of Applicants")]
    pub number_of_applicants: String,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "Employment Type")]
    pub employment_type: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

/// Job records in discovery order. Duplicates are kept.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<JobRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore::default()
    }

    pub fn append(&mut self, record: JobRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    /// Writes one row per record under the fixed header, then empties the store.
    pub fn flush<P: AsRef<Path>>(&mut self, destination: P) -> ScrapeResult<usize> {
        let path = destination.as_ref();
        let file = File::create(path)?;
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        csv_writer.write_record(HEADERS)?;
        for record in &self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;

        let written = self.records.len();
        self.records.clear();
        info!("Data saved to {:?} ({} rows)", path, written);
        Ok(written)
    }

    /// Reads back a file written by [`RecordStore::flush`].
    pub fn load<P: AsRef<Path>>(source: P) -> ScrapeResult<RecordStore> {
        let file = File::open(source.as_ref())?;
        let mut rdr = csv::ReaderBuilder::new().from_reader(file);

        let mut store = RecordStore::new();
        for result in rdr.deserialize() {
            store.append(result?);
        }
        Ok(store)
    }
}
