//! Crawl command.

use std::path::Path;

use anyhow::bail;
use console::style;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, Settings};
use crate::repository::ContentStore;
use crate::services::{CrawlEvent, CrawlOptions, CrawlService};

/// Crawl configured sites and store the articles they yield.
pub async fn cmd_crawl(
    settings: &Settings,
    config_path: &Path,
    site_filters: &[String],
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let config = Config::load_or_default(config_path)?;
    if config.sites.is_empty() {
        bail!(
            "no sites configured; run 'cintel init' or add [[sites]] entries to {}",
            config_path.display()
        );
    }

    let sites = if site_filters.is_empty() {
        config.sites.clone()
    } else {
        let filters: Vec<String> = site_filters.iter().map(|f| f.to_lowercase()).collect();
        config
            .sites
            .iter()
            .filter(|site| {
                let name = site.display_name().to_lowercase();
                let url = site.url.to_lowercase();
                filters.iter().any(|f| name.contains(f) || url.contains(f))
            })
            .cloned()
            .collect()
    };
    if sites.is_empty() {
        bail!("no configured site matches {:?}", site_filters);
    }

    let mut options = CrawlOptions::from(&config.crawl);
    if let Some(limit) = limit {
        options.max_pages_per_site = limit;
    }

    settings.ensure_directories()?;
    let store = ContentStore::open(&settings.database_path())?;
    let service = CrawlService::new(store.articles.clone(), options)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!(
                "\n{} Stopping after in-flight writes finish...",
                style("!").yellow()
            );
            ctrl_c.cancel();
        }
    });

    let (events, mut event_rx) = mpsc::channel(64);
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                CrawlEvent::SiteStarted { site } => {
                    println!("{} Crawling {}", style("→").cyan(), style(&site).bold());
                }
                CrawlEvent::PageStored { url, .. } => {
                    println!("  {} {}", style("✓").green(), url);
                }
                CrawlEvent::PageFailed { url, error, .. } => {
                    println!("  {} {} ({})", style("✗").red(), url, error);
                }
                CrawlEvent::SiteFinished {
                    site,
                    stored,
                    failed,
                } => {
                    println!(
                        "{} {}: {} stored, {} failed",
                        style("✓").green(),
                        site,
                        stored,
                        failed
                    );
                }
            }
        }
    });

    let outcome = service.run(sites, cancel, events).await;
    let _ = printer.await;

    println!(
        "\n{} Pass complete: {} pages stored, {} failed across {} site(s)",
        style("✓").green(),
        outcome.pages_stored,
        outcome.pages_failed,
        outcome.sites
    );
    if outcome.seed_failures > 0 {
        println!(
            "{} {} site(s) skipped: seed page failed",
            style("!").yellow(),
            outcome.seed_failures
        );
    }

    Ok(())
}
