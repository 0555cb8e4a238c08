use std::collections::HashMap;
use log::warn;
use serde::Serialize;
use crate::dataset::CategoryView;
use crate::error::{AggregateError, AggregateResult};
use crate::extractor::parse_applicant_count;
use crate::tag_list;

pub const EXPERIENCE_LEVELS: [&str; 5] = ["Intern", "Executive", "Senior", "Mid", "Junior"];
pub const EDUCATION_LABELS: [&str; 2] = ["Mentioned", "Not Mentioned"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Decodes every cell of a list-valued column; the first undecodable cell
/// fails the whole column.
pub fn decode_column(view: &CategoryView<'_>, column: &str) -> AggregateResult<Vec<Vec<String>>> {
    view.cells(column)?
        .into_iter()
        .map(|(row, value)| {
            tag_list::parse(value).map_err(|e| {
                warn!("Row {} has an undecodable {} cell: {}", row, column, e);
                AggregateError::Decode {
                    row,
                    column: column.to_string(),
                    value: value.to_string(),
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// The `n` most frequent tags of `column`, by descending count with ties in
/// first-seen order. Percentages are taken over all tag occurrences in the
/// category, including tags that fall outside the top `n`.
pub fn top_n(view: &CategoryView<'_>, column: &str, n: usize) -> AggregateResult<Vec<TagCount>> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for tags in decode_column(view, column)? {
        for tag in tags {
            total += 1;
            match index.get(&tag) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(tag.clone(), counts.len());
                    counts.push((tag, 1));
                }
            }
        }
    }

    if total == 0 {
        return Err(empty(view, column));
    }

    // stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);

    Ok(counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag,
            count,
            percentage: percent(count, total),
        })
        .collect())
}

/// Counts rows whose `column` value equals one of `labels`. Rows matching no
/// label are left out of both the counts and the percentage base.
pub fn distribution(view: &CategoryView<'_>, column: &str, labels: &[&str]) -> AggregateResult<Vec<LabelCount>> {
    let mut counts = vec![0usize; labels.len()];
    for (_, value) in view.cells(column)? {
        if let Some(i) = labels.iter().position(|l| *l == value) {
            counts[i] += 1;
        }
    }
    label_counts(view, column, labels, counts)
}

pub fn experience_distribution(view: &CategoryView<'_>) -> AggregateResult<Vec<LabelCount>> {
    distribution(view, "Experience", &EXPERIENCE_LEVELS)
}

/// Splits rows into "Mentioned" (non-empty `Education` list) and
/// "Not Mentioned" (empty list).
pub fn education_distribution(view: &CategoryView<'_>) -> AggregateResult<Vec<LabelCount>> {
    let column = "Education";
    let mut counts = vec![0usize; 2];
    for tags in decode_column(view, column)? {
        if tags.is_empty() {
            counts[1] += 1;
        } else {
            counts[0] += 1;
        }
    }
    label_counts(view, column, &EDUCATION_LABELS, counts)
}

/// Percentage of the category's rows whose `column` satisfies `predicate`.
pub fn ratio<F>(view: &CategoryView<'_>, column: &str, predicate: F) -> AggregateResult<f64>
where
    F: Fn(&str) -> bool,
{
    let cells = view.cells(column)?;
    if cells.is_empty() {
        return Err(empty(view, column));
    }
    let matching = cells.iter().filter(|&&(_, v)| predicate(v)).count();
    Ok(percent(matching, cells.len()))
}

pub fn location_share(view: &CategoryView<'_>, location: &str) -> AggregateResult<f64> {
    ratio(view, "Location", |v| v == location)
}

pub fn applicants_share(view: &CategoryView<'_>, threshold: &str) -> AggregateResult<f64> {
    ratio(view, "Number of Applicants", |v| v == threshold)
}

/// Mean of the applicant counts that can be read off the category's
/// `Number of Applicants` captions. Captions without a number are skipped.
pub fn average_applicants(view: &CategoryView<'_>) -> AggregateResult<f64> {
    let column = "Number of Applicants";
    let counts: Vec<u32> = view
        .cells(column)?
        .into_iter()
        .filter_map(|(_, v)| parse_applicant_count(v))
        .collect();
    if counts.is_empty() {
        return Err(empty(view, column));
    }
    let sum: u64 = counts.iter().map(|&c| u64::from(c)).sum();
    Ok(sum as f64 / counts.len() as f64)
}

fn label_counts(view: &CategoryView<'_>, column: &str, labels: &[&str], counts: Vec<usize>) -> AggregateResult<Vec<LabelCount>> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return Err(empty(view, column));
    }
    Ok(labels
        .iter()
        .zip(counts)
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
            percentage: percent(count, total),
        })
        .collect())
}

fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

fn empty(view: &CategoryView<'_>, column: &str) -> AggregateError {
    AggregateError::EmptyPopulation {
        category: view.category().to_string(),
        column: column.to_string(),
    }
}
