//! Bounded, paced page fetching.

mod pacer;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::debug;

pub use pacer::HostPacer;

/// Sites serve different markup to obvious bots; present a desktop browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A fetched page body, still unparsed. The URL is the final one after
/// redirects, the right base for resolving the page's links.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub url: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
}

/// Shared page fetcher: one HTTP client behind a global concurrency limit
/// and a per-host pacer. Clones share the client, the limit, and the pacer.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    permits: Arc<Semaphore>,
    pacer: HostPacer,
}

impl PageFetcher {
    pub fn new(
        global_concurrency: usize,
        request_timeout: Duration,
        pacing_delay: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(global_concurrency.max(1))),
            pacer: HostPacer::new(pacing_delay),
        })
    }

    /// Fetch one page. Waits for a global permit, then for the host's pacing
    /// slot, then performs the request. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        let _permit = self.permits.acquire().await.unwrap();
        // The pacing slot must be the last wait before the request goes out,
        // or the spacing it promises would be eaten by the permit queue.
        self.pacer.acquire(url).await;

        let started = std::time::Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| classify(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|source| classify(url, source))?;
        debug!(
            url,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched page"
        );
        Ok(RawPage {
            url: final_url,
            body,
        })
    }
}

fn classify(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source,
        }
    }
}
