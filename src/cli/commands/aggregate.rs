//! Aggregate command.

use std::path::Path;

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::repository::ContentStore;
use crate::services::InsightService;

/// Aggregate the stored corpus into a new insight snapshot.
pub fn cmd_aggregate(settings: &Settings, output: Option<&Path>) -> anyhow::Result<()> {
    let store = ContentStore::open(&settings.database_path())?;
    let articles = store.articles.count()?;

    let service = InsightService::new(store.articles, store.insights);
    let snapshot = service
        .run()
        .context("aggregation failed; the previous snapshot remains current")?;

    println!(
        "{} Snapshot #{} generated from {} article(s)",
        style("✓").green(),
        snapshot.id,
        articles
    );
    println!("  top headlines   {}", snapshot.top_headlines.len());
    println!("  keywords        {}", snapshot.keyword_frequency.len());
    println!(
        "  avg word count  {:.1}",
        snapshot.average_metrics.word_count
    );

    if let Some(path) = output {
        InsightService::export_json(&snapshot, path)?;
        println!("  {} Wrote {}", style("✓").green(), path.display());
    }

    Ok(())
}
