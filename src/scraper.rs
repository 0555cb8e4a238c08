use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT, ACCEPT_LANGUAGE};
use scraper::Html;
use log::{info, warn};
use rand::seq::SliceRandom;
use url::Url;
use crate::config::{ScraperConfig, USER_AGENTS};
use crate::delay_manager;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractor::Extractor;
use crate::store::{JobRecord, RecordStore};

/// Anything that can hand back the body of a URL.
pub trait PageSource {
    fn get(&self, url: &str) -> ScrapeResult<String>;
}

/// Blocking HTTP source. The user agent is drawn once and reused for every
/// request made through this source. An empty pool in the configuration falls
/// back to the built-in agents.
pub struct HttpSource {
    client: Client,
    user_agent: String,
}

impl HttpSource {
    pub fn new(config: &ScraperConfig) -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .cookie_store(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;

        let mut rng = rand::thread_rng();
        let user_agent = match config.user_agents.choose(&mut rng) {
            Some(ua) => ua.clone(),
            None => {
                warn!("User-agent pool is empty, using the built-in agents");
                USER_AGENTS.choose(&mut rng).map(|ua| ua.to_string()).unwrap_or_default()
            }
        };

        Ok(HttpSource { client, user_agent })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn request(&self, url: &str) -> RequestBuilder {
        self.client.get(url).header(USER_AGENT, &self.user_agent)
    }
}

impl PageSource for HttpSource {
    fn get(&self, url: &str) -> ScrapeResult<String> {
        let resp = self.request(url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus { url: url.to_string(), status });
        }
        Ok(resp.text()?)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub pages_requested: usize,
    pub pages_skipped: usize,
    pub jobs_scraped: usize,
}

pub struct Scraper<S> {
    source: S,
    extractor: Extractor,
    config: ScraperConfig,
}

impl Scraper<HttpSource> {
    pub fn from_config(config: ScraperConfig) -> ScrapeResult<Self> {
        let source = HttpSource::new(&config)?;
        info!("Using user agent: {}", source.user_agent());
        Ok(Scraper::new(source, config))
    }
}

impl<S: PageSource> Scraper<S> {
    pub fn new(source: S, config: ScraperConfig) -> Self {
        Scraper {
            source,
            extractor: Extractor::new(),
            config,
        }
    }

    pub fn listing_url(&self, keyword: &str, page_index: usize) -> String {
        format!(
            "{}/jobs-guest/jobs/api/seeMoreJobPostings/{}-jobs?start={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(keyword),
            self.config.page_size * page_index
        )
    }

    /// Fetches one job-detail page and extracts a record from it. A failed
    /// request is returned as is, never retried.
    pub fn fetch_job(&self, url: &str) -> ScrapeResult<JobRecord> {
        delay_manager::random_job_delay(&self.config.job_delay);
        let html = self.source.get(url)?;
        let document = Html::parse_document(&html);
        Ok(self.extractor.record(&document))
    }

    /// Walks `pages` listing pages for `keyword`, appending every job found to
    /// `store` in discovery order.
    ///
    /// A listing page that cannot be fetched is logged and skipped. A failed
    /// job-detail fetch aborts the run; records gathered before it stay in
    /// `store`.
    pub fn scrape(&self, keyword: &str, pages: usize, store: &mut RecordStore) -> ScrapeResult<ScrapeSummary> {
        let mut summary = ScrapeSummary::default();
        delay_manager::random_session_delay(&self.config.session_delay);

        for page_index in 0..pages {
            let url = self.listing_url(keyword, page_index);
            info!("Visiting listing page {}: {}", page_index + 1, url);
            summary.pages_requested += 1;

            let links = match self.source.get(&url) {
                Ok(html) => self.extractor.job_links(&Html::parse_document(&html)),
                Err(e) => {
                    warn!("Skipping listing page {}: {}", page_index + 1, e);
                    summary.pages_skipped += 1;
                    continue;
                }
            };

            for (num, link) in links.iter().enumerate() {
                info!("Scraping job {} on page {}", num + 1, page_index + 1);
                let record = self.fetch_job(&self.resolve(link))?;
                store.append(record);
                summary.jobs_scraped += 1;
            }
        }

        info!(
            "Scraped {} jobs from {} pages ({} skipped)",
            summary.jobs_scraped, summary.pages_requested, summary.pages_skipped
        );
        Ok(summary)
    }

    // Listing anchors are normally absolute; relative ones hang off the base URL.
    fn resolve(&self, link: &str) -> String {
        if Url::parse(link).is_ok() {
            return link.to_string();
        }
        Url::parse(&self.config.base_url)
            .and_then(|base| base.join(link))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| link.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use reqwest::StatusCode;

    const BASE: &str = "https://jobs.example.test";

    #[derive(Default)]
    struct MockSource {
        pages: HashMap<String, Result<String, StatusCode>>,
        requests: RefCell<Vec<String>>,
    }

    impl MockSource {
        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(body.to_string()));
            self
        }

        fn failing(mut self, url: &str, status: StatusCode) -> Self {
            self.pages.insert(url.to_string(), Err(status));
            self
        }
    }

    impl PageSource for &MockSource {
        fn get(&self, url: &str) -> ScrapeResult<String> {
            self.requests.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(ScrapeError::HttpStatus { url: url.to_string(), status: *status }),
                None => Err(ScrapeError::HttpStatus { url: url.to_string(), status: StatusCode::NOT_FOUND }),
            }
        }
    }

    fn config() -> ScraperConfig {
        ScraperConfig {
            base_url: BASE.to_string(),
            ..ScraperConfig::without_delays()
        }
    }

    fn listing(links: &[&str]) -> String {
        links
            .iter()
            .map(|l| format!(r#"<li><a class="base-card__full-link" href="{}">job</a></li>"#, l))
            .collect()
    }

    fn job(title: &str) -> String {
        format!(r#"<h1 class="top-card-layout__title">{}</h1>"#, title)
    }

    fn listing_url(keyword: &str, start: usize) -> String {
        format!("{}/jobs-guest/jobs/api/seeMoreJobPostings/{}-jobs?start={}", BASE, keyword, start)
    }

    #[test]
    fn builds_paginated_listing_urls() {
        let source = MockSource::default();
        let scraper = Scraper::new(&source, config());
        assert_eq!(scraper.listing_url("data-analyst", 0), listing_url("data-analyst", 0));
        assert_eq!(scraper.listing_url("data-analyst", 3), listing_url("data-analyst", 30));
        assert_eq!(
            scraper.listing_url("data analyst", 1),
            listing_url("data%20analyst", 10)
        );
    }

    #[test]
    fn scrapes_pages_and_jobs_in_order() {
        let source = MockSource::default()
            .page(&listing_url("rust", 0), &listing(&[
                "https://jobs.example.test/view/1",
                "https://jobs.example.test/view/2",
            ]))
            .page(&listing_url("rust", 10), &listing(&["/view/3"]))
            .page("https://jobs.example.test/view/1", &job("One"))
            .page("https://jobs.example.test/view/2", &job("Two"))
            .page("https://jobs.example.test/view/3", &job("Three"));

        let scraper = Scraper::new(&source, config());
        let mut store = RecordStore::new();
        let summary = scraper.scrape("rust", 2, &mut store).unwrap();

        assert_eq!(summary, ScrapeSummary { pages_requested: 2, pages_skipped: 0, jobs_scraped: 3 });
        let titles: Vec<&str> = store.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(
            *source.requests.borrow(),
            vec![
                listing_url("rust", 0),
                "https://jobs.example.test/view/1".to_string(),
                "https://jobs.example.test/view/2".to_string(),
                listing_url("rust", 10),
                "https://jobs.example.test/view/3".to_string(),
            ]
        );
    }

    #[test]
    fn failed_listing_page_is_skipped() {
        let source = MockSource::default()
            .failing(&listing_url("go", 0), StatusCode::TOO_MANY_REQUESTS)
            .page(&listing_url("go", 10), &listing(&["https://jobs.example.test/view/9"]))
            .page("https://jobs.example.test/view/9", &job("Nine"));

        let scraper = Scraper::new(&source, config());
        let mut store = RecordStore::new();
        let summary = scraper.scrape("go", 2, &mut store).unwrap();

        assert_eq!(summary.pages_skipped, 1);
        assert_eq!(summary.jobs_scraped, 1);
        assert_eq!(store.records()[0].title, "Nine");
    }

    #[test]
    fn failed_job_fetch_aborts_but_keeps_earlier_records() {
        let source = MockSource::default()
            .page(&listing_url("qa", 0), &listing(&[
                "https://jobs.example.test/view/1",
                "https://jobs.example.test/view/broken",
                "https://jobs.example.test/view/3",
            ]))
            .page("https://jobs.example.test/view/1", &job("One"))
            .failing("https://jobs.example.test/view/broken", StatusCode::INTERNAL_SERVER_ERROR);

        let scraper = Scraper::new(&source, config());
        let mut store = RecordStore::new();
        let err = scraper.scrape("qa", 1, &mut store).unwrap_err();

        assert!(err.is_network());
        assert_eq!(store.len(), 1);
        assert!(!source.requests.borrow().contains(&"https://jobs.example.test/view/3".to_string()));
    }

    #[test]
    fn fetch_job_fills_unknown_for_missing_markers() {
        let source = MockSource::default()
            .page("https://jobs.example.test/view/7", &job("Seven"));
        let scraper = Scraper::new(&source, config());

        let record = scraper.fetch_job("https://jobs.example.test/view/7").unwrap();
        assert_eq!(record.title, "Seven");
        assert_eq!(record.company, "Unknown");
        assert_eq!(record.experience, "Unknown");
    }

    #[test]
    fn http_source_reuses_one_user_agent() {
        let config = config();
        let source = HttpSource::new(&config).unwrap();
        assert!(config.user_agents.iter().any(|ua| ua == source.user_agent()));

        let first = source.request("https://jobs.example.test/view/1").build().unwrap();
        let second = source.request("https://jobs.example.test/view/2").build().unwrap();
        let ua = first.headers().get(USER_AGENT).unwrap();
        assert_eq!(ua.to_str().unwrap(), source.user_agent());
        assert_eq!(second.headers().get(USER_AGENT), Some(ua));
    }

    #[test]
    fn empty_user_agent_pool_falls_back_to_builtin_agents() {
        let config = ScraperConfig {
            user_agents: Vec::new(),
            ..config()
        };
        let source = HttpSource::new(&config).unwrap();

        assert!(!source.user_agent().is_empty());
        assert!(USER_AGENTS.iter().any(|ua| *ua == source.user_agent()));
    }

    #[test]
    fn zero_pages_makes_no_requests() {
        let source = MockSource::default();
        let scraper = Scraper::new(&source, config());
        let mut store = RecordStore::new();

        let summary = scraper.scrape("rust", 0, &mut store).unwrap();
        assert_eq!(summary, ScrapeSummary::default());
        assert!(source.requests.borrow().is_empty());
    }
}
