use std::time::Duration;

use crate::config::CrawlConfig;

/// Tuning knobs for one crawl pass.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// In-flight request ceiling across every site in the pass.
    pub global_concurrency: usize,
    /// In-flight request ceiling within one site.
    pub per_host_concurrency: usize,
    pub request_timeout: Duration,
    /// Minimum spacing between two requests to the same host.
    pub pacing_delay: Duration,
    pub max_pages_per_site: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            global_concurrency: 15,
            per_host_concurrency: 2,
            request_timeout: Duration::from_secs(10),
            pacing_delay: Duration::from_millis(500),
            max_pages_per_site: 100,
        }
    }
}

impl From<&CrawlConfig> for CrawlOptions {
    fn from(config: &CrawlConfig) -> Self {
        Self {
            global_concurrency: config.global_concurrency,
            per_host_concurrency: config.per_host_concurrency,
            request_timeout: config.request_timeout(),
            pacing_delay: config.pacing_delay(),
            max_pages_per_site: config.max_pages_per_site,
        }
    }
}

/// Progress notifications emitted while a pass runs.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    SiteStarted {
        site: String,
    },
    PageStored {
        site: String,
        url: String,
    },
    PageFailed {
        site: String,
        url: String,
        error: String,
    },
    SiteFinished {
        site: String,
        stored: usize,
        failed: usize,
    },
}

/// Totals for a finished pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrawlOutcome {
    pub sites: usize,
    pub pages_stored: usize,
    pub pages_failed: usize,
    /// Sites whose seed page never loaded; their articles were not attempted.
    pub seed_failures: usize,
}
