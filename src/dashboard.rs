use serde::Serialize;
use crate::aggregator::{self, LabelCount, TagCount};
use crate::dataset::Dataset;
use crate::error::AggregateResult;

pub const TARGET_LOCATION: &str = "Bucharest";
pub const APPLICANTS_THRESHOLD: &str = "Over 200 applicants";

/// A chart's payload, or the marker telling the renderer there is nothing to
/// draw for this category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Panel<T> {
    Data(T),
    NoData,
}

impl<T> Panel<T> {
    fn from_result(result: AggregateResult<T>) -> AggregateResult<Panel<T>> {
        match result {
            Ok(data) => Ok(Panel::Data(data)),
            Err(e) if e.is_no_data() => Ok(Panel::NoData),
            Err(e) => Err(e),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Panel::Data(d) => Some(d),
            Panel::NoData => None,
        }
    }
}

/// Everything the dashboard shows for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub category: String,
    pub job_count: usize,
    pub education: Panel<Vec<LabelCount>>,
    pub clouds: Panel<Vec<TagCount>>,
    pub jobs_in_target_location: Panel<f64>,
    pub languages: Panel<Vec<TagCount>>,
    pub technologies: Panel<Vec<TagCount>>,
    pub databases: Panel<Vec<TagCount>>,
    pub experience: Panel<Vec<LabelCount>>,
    pub tools: Panel<Vec<TagCount>>,
    pub jobs_over_applicant_threshold: Panel<f64>,
    pub average_applicants: Panel<f64>,
}

impl CategoryReport {
    /// Heading line shown above the charts.
    pub fn headline(&self) -> String {
        format!("Analyzing {} trends across {} jobs", self.category, self.job_count)
    }
}

/// Builds the report for `category`. Empty populations become
/// [`Panel::NoData`]; decode failures and missing columns are returned.
pub fn build(dataset: &Dataset, category: &str) -> AggregateResult<CategoryReport> {
    let view = dataset.view(category)?;

    Ok(CategoryReport {
        category: category.to_string(),
        job_count: view.len(),
        education: Panel::from_result(aggregator::education_distribution(&view))?,
        clouds: Panel::from_result(aggregator::top_n(&view, "Clouds", 3))?,
        jobs_in_target_location: Panel::from_result(aggregator::location_share(&view, TARGET_LOCATION))?,
        languages: Panel::from_result(aggregator::top_n(&view, "Languages", 10))?,
        technologies: Panel::from_result(aggregator::top_n(&view, "Technologies", 10))?,
        databases: Panel::from_result(aggregator::top_n(&view, "Databases", 8))?,
        experience: Panel::from_result(aggregator::experience_distribution(&view))?,
        tools: Panel::from_result(aggregator::top_n(&view, "Tools", 3))?,
        jobs_over_applicant_threshold: Panel::from_result(aggregator::applicants_share(&view, APPLICANTS_THRESHOLD))?,
        average_applicants: Panel::from_result(aggregator::average_applicants(&view))?,
    })
}

/// One report per category, in first-seen category order.
pub fn build_all(dataset: &Dataset) -> AggregateResult<Vec<CategoryReport>> {
    dataset
        .categories()?
        .into_iter()
        .map(|category| build(dataset, category))
        .collect()
}
