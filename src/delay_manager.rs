use std::ops::RangeInclusive;
use std::time::Duration;
use std::thread;
use rand::Rng;
use log::info;

/// Blocks once at the start of a scraping session.
pub fn random_session_delay(range: &RangeInclusive<u64>) {
    wait("Session Delay", range);
}

/// Blocks before every job-detail request.
pub fn random_job_delay(range: &RangeInclusive<u64>) {
    wait("Job Delay", range);
}

fn wait(kind: &str, range: &RangeInclusive<u64>) {
    let delay_secs = pick(range);
    if let Some(message) = delay_message(kind, delay_secs) {
        info!("{}", message);
    }
    sleep_secs(delay_secs);
}

// Zero-length waits are silent.
fn delay_message(kind: &str, secs: u64) -> Option<String> {
    (secs > 0).then(|| format!("Waiting for {} seconds ({})...", secs, kind))
}

fn pick(range: &RangeInclusive<u64>) -> u64 {
    if range.is_empty() {
        return 0;
    }
    let mut rng = rand::thread_rng();
    rng.gen_range(range.clone())
}

fn sleep_secs(secs: u64) {
    if secs > 0 {
        thread::sleep(Duration::from_secs(secs));
    }
}
