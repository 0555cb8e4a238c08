use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;
use log::warn;

pub const DEFAULT_BASE_URL: &str = "https://ro.linkedin.com";

pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Knobs for a scraping session. Delays are in whole seconds.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub session_delay: RangeInclusive<u64>,
    pub job_delay: RangeInclusive<u64>,
    /// Step of the listing `start` offset between consecutive pages.
    pub page_size: usize,
    pub user_agents: Vec<String>,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_delay: 10..=30,
            job_delay: 5..=10,
            page_size: 10,
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            timeout: None,
        }
    }
}

impl ScraperConfig {
    /// Defaults, overridden by `SKILL_SCOPE_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = ScraperConfig::default();

        if let Ok(url) = env::var("SKILL_SCOPE_BASE_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if url::Url::parse(&url).is_ok() {
                config.base_url = url;
            } else {
                warn!("Ignoring invalid SKILL_SCOPE_BASE_URL: {}", url);
            }
        }
        if let Some(range) = range_var("SKILL_SCOPE_SESSION_DELAY") {
            config.session_delay = range;
        }
        if let Some(range) = range_var("SKILL_SCOPE_JOB_DELAY") {
            config.job_delay = range;
        }
        if let Ok(secs) = env::var("SKILL_SCOPE_TIMEOUT") {
            match secs.trim().parse::<u64>() {
                Ok(s) => config.timeout = Some(Duration::from_secs(s)),
                Err(_) => warn!("Ignoring invalid SKILL_SCOPE_TIMEOUT: {}", secs),
            }
        }
        config
    }

    /// Configuration with no pacing, for driving the scraper against local sources.
    pub fn without_delays() -> Self {
        ScraperConfig {
            session_delay: 0..=0,
            job_delay: 0..=0,
            ..ScraperConfig::default()
        }
    }
}

fn range_var(name: &str) -> Option<RangeInclusive<u64>> {
    let raw = env::var(name).ok()?;
    let parsed = parse_range(&raw);
    if parsed.is_none() {
        warn!("Ignoring invalid {}: {}", name, raw);
    }
    parsed
}

/// Parses `"min-max"` (or a single number) into an inclusive range.
pub fn parse_range(raw: &str) -> Option<RangeInclusive<u64>> {
    let raw = raw.trim();
    let (lo, hi) = match raw.split_once('-') {
        Some((lo, hi)) => (lo.trim().parse().ok()?, hi.trim().parse().ok()?),
        None => {
            let v = raw.parse().ok()?;
            (v, v)
        }
    };
    if lo > hi {
        return None;
    }
    Some(lo..=hi)
}
