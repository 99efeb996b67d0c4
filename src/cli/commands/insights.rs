//! Insight snapshot inspection commands.

use console::style;

use crate::config::Settings;
use crate::repository::ContentStore;

/// Show the latest insight snapshot.
pub fn cmd_latest(settings: &Settings) -> anyhow::Result<()> {
    let store = ContentStore::open(&settings.database_path())?;
    let snapshot = match store.insights.latest()? {
        Some(snapshot) => snapshot,
        None => {
            println!(
                "{} No snapshots yet; run: cintel aggregate",
                style("!").yellow()
            );
            return Ok(());
        }
    };

    println!(
        "{} Snapshot #{} from {}",
        style("✓").green(),
        snapshot.id,
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    println!("\n{}", style("Top headlines").bold());
    if snapshot.top_headlines.is_empty() {
        println!("  (none)");
    }
    for headline in snapshot.top_headlines.iter().take(10) {
        println!("  {}", headline);
    }

    println!("\n{}", style("Common keywords").bold());
    if snapshot.keyword_frequency.is_empty() {
        println!("  (none)");
    }
    for entry in snapshot.keyword_frequency.iter().take(10) {
        println!("  {:<20} {}", entry.keyword, entry.count);
    }

    let avg = &snapshot.average_metrics;
    println!("\n{}", style("Averages per article").bold());
    println!("  word count      {:.1}", avg.word_count);
    println!("  internal links  {:.1}", avg.internal_links);
    println!("  external links  {:.1}", avg.external_links);
    println!("  images          {:.1}", avg.images);

    Ok(())
}

/// List snapshots, newest first.
pub fn cmd_history(settings: &Settings, limit: u32) -> anyhow::Result<()> {
    let store = ContentStore::open(&settings.database_path())?;
    let snapshots = store.insights.history(limit)?;

    if snapshots.is_empty() {
        println!(
            "{} No snapshots yet; run: cintel aggregate",
            style("!").yellow()
        );
        return Ok(());
    }

    println!(
        "{:>4}  {:<23}  {:>9}  {:>8}  {:>9}",
        "ID", "GENERATED", "HEADLINES", "KEYWORDS", "AVG WORDS"
    );
    for snapshot in &snapshots {
        println!(
            "{:>4}  {:<23}  {:>9}  {:>8}  {:>9.1}",
            snapshot.id,
            snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            snapshot.top_headlines.len(),
            snapshot.keyword_frequency.len(),
            snapshot.average_metrics.word_count
        );
    }

    Ok(())
}
