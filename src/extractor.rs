use std::sync::OnceLock;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use crate::store::JobRecord;

/// Sentinel stored for any field whose marker is absent from the document.
pub const UNKNOWN: &str = "Unknown";

const EXPERIENCE_LABEL: &str = "Seniority level";
const EMPLOYMENT_TYPE_LABEL: &str = "Employment type";

/// One semantic field of a job-detail document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Company,
    Location,
    Applicants,
    Experience,
    EmploymentType,
    Description,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Company,
        Field::Location,
        Field::Applicants,
        Field::Experience,
        Field::EmploymentType,
        Field::Description,
    ];
}

pub struct Extractor {
    title: Selector,
    company: Selector,
    location: Selector,
    applicants: Selector,
    description: Selector,
    criteria_item: Selector,
    criteria_label: Selector,
    criteria_text: Selector,
    job_link: Selector,
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            title: Selector::parse(".top-card-layout__title").unwrap(),
            company: Selector::parse(".topcard__org-name-link").unwrap(),
            location: Selector::parse(".topcard__flavor--bullet").unwrap(),
            applicants: Selector::parse(".num-applicants__caption").unwrap(),
            description: Selector::parse(".show-more-less-html__markup").unwrap(),
            criteria_item: Selector::parse("li.description__job-criteria-item").unwrap(),
            criteria_label: Selector::parse(".description__job-criteria-subheader").unwrap(),
            criteria_text: Selector::parse("span.description__job-criteria-text").unwrap(),
            job_link: Selector::parse("a.base-card__full-link").unwrap(),
        }
    }

    /// Trimmed text of `field`, or [`UNKNOWN`] when its marker is missing.
    /// Never fails, whatever the document looks like.
    pub fn extract(&self, document: &Html, field: Field) -> String {
        match field {
            Field::Title => first_text(document, &self.title),
            Field::Company => first_text(document, &self.company),
            Field::Location => first_text(document, &self.location),
            Field::Applicants => first_text(document, &self.applicants),
            Field::Description => first_text(document, &self.description),
            Field::Experience => self.criterion(document, EXPERIENCE_LABEL, 0),
            Field::EmploymentType => self.criterion(document, EMPLOYMENT_TYPE_LABEL, 1),
        }
    }

    /// Runs every field over one job-detail document.
    pub fn record(&self, document: &Html) -> JobRecord {
        JobRecord {
            title: self.extract(document, Field::Title),
            company: self.extract(document, Field::Company),
            location: self.extract(document, Field::Location),
            number_of_applicants: self.extract(document, Field::Applicants),
            experience: self.extract(document, Field::Experience),
            employment_type: self.extract(document, Field::EmploymentType),
            description: self.extract(document, Field::Description),
        }
    }

    /// Job-detail links of a listing page, in document order.
    pub fn job_links(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.job_link)
            .filter_map(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
            .collect()
    }

    // Criteria items carry their own label; match on it. Only documents whose
    // criteria have no labels at all fall back to list position.
    fn criterion(&self, document: &Html, label: &str, index: usize) -> String {
        let items: Vec<ElementRef> = document.select(&self.criteria_item).collect();
        let labelled = items
            .iter()
            .any(|item| item.select(&self.criteria_label).next().is_some());

        if labelled {
            return items
                .iter()
                .find(|item| {
                    item.select(&self.criteria_label)
                        .next()
                        .map_or(false, |h| element_text(h).eq_ignore_ascii_case(label))
                })
                .and_then(|item| item.select(&self.criteria_text).next())
                .map(element_text)
                .unwrap_or_else(|| UNKNOWN.to_string());
        }

        document
            .select(&self.criteria_text)
            .nth(index)
            .map(element_text)
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// First integer in an applicants caption such as "Over 200 applicants".
pub fn parse_applicant_count(caption: &str) -> Option<u32> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let number = NUMBER.get_or_init(|| Regex::new(r"\d[\d,]*").unwrap());
    let m = number.find(caption)?;
    m.as_str().replace(',', "").parse().ok()
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
