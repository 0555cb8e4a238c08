use std::fs::File;
use std::path::Path;
use log::info;
use calamine::{open_workbook_auto, Data, Range, Reader};
use crate::error::{AggregateError, AggregateResult};

pub const CATEGORY_COLUMN: &str = "Category";

/// The processed, category-labelled table the dashboard reads. Cells are kept
/// as trimmed text; list-valued columns are decoded on demand.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Dataset { headers, rows }
    }

    /// Loads a `.csv`, `.xlsx` or `.xls` file. The first row is the header.
    pub fn load<P: AsRef<Path>>(path: P) -> AggregateResult<Dataset> {
        let path_ref = path.as_ref();
        let is_excel = path_ref
            .extension()
            .map_or(false, |ext| ext == "xlsx" || ext == "xls");

        let dataset = if is_excel {
            load_excel(path_ref)?
        } else {
            load_csv(path_ref)?
        };
        info!("Loaded {} rows from {:?}", dataset.rows.len(), path_ref);
        Ok(dataset)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> AggregateResult<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AggregateError::MissingColumn(name.to_string()))
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> AggregateResult<Vec<&str>> {
        let idx = self.column(CATEGORY_COLUMN)?;
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            let category = cell(row, idx);
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        Ok(seen)
    }

    /// Rows whose `Category` equals `category`.
    pub fn view(&self, category: &str) -> AggregateResult<CategoryView<'_>> {
        let idx = self.column(CATEGORY_COLUMN)?;
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| cell(row, idx) == category)
            .map(|(i, _)| i)
            .collect();

        Ok(CategoryView {
            dataset: self,
            category: category.to_string(),
            rows,
        })
    }
}

/// A read-only, category-scoped slice of a [`Dataset`]. Every aggregation
/// works against this population.
#[derive(Debug, Clone)]
pub struct CategoryView<'a> {
    dataset: &'a Dataset,
    category: String,
    rows: Vec<usize>,
}

impl<'a> CategoryView<'a> {
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Number of jobs in the category.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(row number, cell)` pairs of `column`; row numbers are 1-based
    /// positions in the whole dataset.
    pub fn cells(&self, column: &str) -> AggregateResult<Vec<(usize, &'a str)>> {
        let idx = self.dataset.column(column)?;
        let dataset = self.dataset;
        Ok(self
            .rows
            .iter()
            .map(|&i| (i + 1, cell(&dataset.rows[i], idx)))
            .collect())
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn load_csv(path: &Path) -> AggregateResult<Dataset> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Dataset { headers, rows })
}

fn load_excel(path: &Path) -> AggregateResult<Dataset> {
    let mut workbook = open_workbook_auto(path)?;
    Ok(from_worksheets(workbook.worksheets()))
}

// Only the first sheet is read; a workbook without sheets is an empty dataset.
fn from_worksheets(worksheets: Vec<(String, Range<Data>)>) -> Dataset {
    let Some((_name, range)) = worksheets.first() else {
        return Dataset::default();
    };

    let mut rows_iter = range
        .rows()
        .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect::<Vec<_>>());
    let headers = rows_iter.next().unwrap_or_default();
    let rows = rows_iter.collect();
    Dataset { headers, rows }
}
