//! Concurrent crawl passes.
//!
//! One task per site. Within a site, page loads run through a bounded
//! buffer while finished pages are parsed and stored from writer tasks, so
//! later loads stay in flight during extraction.

mod types;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::extract::Extractor;
use crate::fetch::{FetchError, PageFetcher};
use crate::frontier::{self, Frontier, UrlPolicy};
use crate::repository::{ArticleRepository, StoreError};

pub use types::{CrawlEvent, CrawlOptions, CrawlOutcome};

type WriteResult = Result<String, (String, StoreError)>;

/// Runs crawl passes over configured sites and stores what they yield.
pub struct CrawlService {
    fetcher: PageFetcher,
    repository: ArticleRepository,
    options: CrawlOptions,
}

/// Everything one site's crawl task needs, cheap to clone per site.
#[derive(Clone)]
struct PassContext {
    fetcher: PageFetcher,
    repository: ArticleRepository,
    options: CrawlOptions,
    cancel: CancellationToken,
    events: mpsc::Sender<CrawlEvent>,
    stored: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    seed_failures: Arc<AtomicUsize>,
}

impl CrawlService {
    pub fn new(repository: ArticleRepository, options: CrawlOptions) -> Result<Self, FetchError> {
        let fetcher = PageFetcher::new(
            options.global_concurrency,
            options.request_timeout,
            options.pacing_delay,
        )?;
        Ok(Self {
            fetcher,
            repository,
            options,
        })
    }

    /// Run one pass over the given sites. Sites crawl concurrently; the
    /// fetcher's global limit bounds the whole pass. Event sends are best
    /// effort and a dropped receiver never stalls the pass.
    pub async fn run(
        &self,
        sites: Vec<SiteConfig>,
        cancel: CancellationToken,
        events: mpsc::Sender<CrawlEvent>,
    ) -> CrawlOutcome {
        let stored = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));
        let seed_failures = Arc::new(AtomicUsize::new(0));
        let site_count = sites.len();

        let mut handles = Vec::with_capacity(site_count);
        for site in sites {
            let ctx = PassContext {
                fetcher: self.fetcher.clone(),
                repository: self.repository.clone(),
                options: self.options.clone(),
                cancel: cancel.clone(),
                events: events.clone(),
                stored: stored.clone(),
                failed: failed.clone(),
                seed_failures: seed_failures.clone(),
            };
            handles.push(tokio::spawn(crawl_site(ctx, site)));
        }
        for handle in handles {
            let _ = handle.await;
        }

        CrawlOutcome {
            sites: site_count,
            pages_stored: stored.load(Ordering::Relaxed),
            pages_failed: failed.load(Ordering::Relaxed),
            seed_failures: seed_failures.load(Ordering::Relaxed),
        }
    }
}

async fn crawl_site(ctx: PassContext, site: SiteConfig) {
    let name = site.display_name();
    let _ = ctx
        .events
        .send(CrawlEvent::SiteStarted { site: name.clone() })
        .await;

    let policy = if site.article_patterns.is_empty() {
        UrlPolicy::default()
    } else {
        UrlPolicy::from_patterns(&site.article_patterns)
    };
    let extractor = Arc::new(Extractor::new(&site.content_selectors));

    let seed = tokio::select! {
        _ = ctx.cancel.cancelled() => return,
        fetched = ctx.fetcher.fetch(&site.url) => fetched,
    };
    let seed = match seed {
        Ok(page) => page,
        Err(error) => {
            warn!(site = %name, %error, "seed page failed, skipping site");
            ctx.seed_failures.fetch_add(1, Ordering::Relaxed);
            let _ = ctx
                .events
                .send(CrawlEvent::SiteFinished {
                    site: name,
                    stored: 0,
                    failed: 0,
                })
                .await;
            return;
        }
    };

    let mut frontier = Frontier::new(policy, &site.url, ctx.options.max_pages_per_site);
    let candidates: Vec<String> = frontier::discover_links(&seed.body, &seed.url)
        .into_iter()
        .filter(|url| frontier.admit(url))
        .collect();
    info!(site = %name, candidates = candidates.len(), "seed page scanned");

    let fetcher = ctx.fetcher.clone();
    let fetches = stream::iter(candidates.into_iter().map(move |url| {
        let fetcher = fetcher.clone();
        async move {
            let outcome = fetcher.fetch(&url).await.map(|page| page.body);
            (url, outcome)
        }
    }))
    .buffer_unordered(ctx.options.per_host_concurrency.max(1));
    tokio::pin!(fetches);

    let mut writers: JoinSet<WriteResult> = JoinSet::new();
    let mut stored = 0usize;
    let mut failed = 0usize;
    let mut cancelled = false;

    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => {
                cancelled = true;
                break;
            }
            Some(joined) = writers.join_next(), if !writers.is_empty() => {
                note_write(&ctx, &name, joined, &mut stored, &mut failed).await;
            }
            next = fetches.next() => {
                match next {
                    None => break,
                    Some((url, Ok(body))) => {
                        let repository = ctx.repository.clone();
                        let extractor = extractor.clone();
                        // Writer tasks never await mid-upsert, so aborting
                        // them cannot tear a transaction.
                        writers.spawn(async move {
                            let bundle = extractor.extract(&url, &body);
                            match repository.upsert_bundle(&bundle) {
                                Ok(_) => Ok(url),
                                Err(error) => Err((url, error)),
                            }
                        });
                    }
                    Some((url, Err(error))) => {
                        failed += 1;
                        ctx.failed.fetch_add(1, Ordering::Relaxed);
                        warn!(site = %name, url = %url, %error, "page fetch failed");
                        let _ = ctx
                            .events
                            .send(CrawlEvent::PageFailed {
                                site: name.clone(),
                                url,
                                error: error.to_string(),
                            })
                            .await;
                    }
                }
            }
        }
    }

    if cancelled {
        writers.shutdown().await;
        info!(site = %name, stored, failed, "crawl cancelled");
    } else {
        while let Some(joined) = writers.join_next().await {
            note_write(&ctx, &name, joined, &mut stored, &mut failed).await;
        }
    }

    let _ = ctx
        .events
        .send(CrawlEvent::SiteFinished {
            site: name,
            stored,
            failed,
        })
        .await;
}

async fn note_write(
    ctx: &PassContext,
    site: &str,
    joined: Result<WriteResult, JoinError>,
    stored: &mut usize,
    failed: &mut usize,
) {
    match joined {
        Ok(Ok(url)) => {
            *stored += 1;
            ctx.stored.fetch_add(1, Ordering::Relaxed);
            let _ = ctx
                .events
                .send(CrawlEvent::PageStored {
                    site: site.to_string(),
                    url,
                })
                .await;
        }
        Ok(Err((url, error))) => {
            *failed += 1;
            ctx.failed.fetch_add(1, Ordering::Relaxed);
            warn!(site, url = %url, %error, "failed to store article");
            let _ = ctx
                .events
                .send(CrawlEvent::PageFailed {
                    site: site.to_string(),
                    url,
                    error: error.to_string(),
                })
                .await;
        }
        Err(join_error) => {
            *failed += 1;
            ctx.failed.fetch_add(1, Ordering::Relaxed);
            warn!(site, %join_error, "writer task aborted");
        }
    }
}
