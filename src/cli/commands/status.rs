//! Status command.

use chrono::Utc;
use console::style;

use crate::config::Settings;
use crate::repository::ContentStore;

/// Show corpus and snapshot totals.
pub fn cmd_status(settings: &Settings) -> anyhow::Result<()> {
    let database_path = settings.database_path();
    if !database_path.exists() {
        println!(
            "{} No database at {}; run: cintel init",
            style("!").yellow(),
            database_path.display()
        );
        return Ok(());
    }

    let store = ContentStore::open(&database_path)?;
    let articles = store.articles.count()?;
    let snapshots = store.insights.count()?;

    println!("{}", style("Corpus").bold());
    println!("  articles   {}", articles);
    println!("  snapshots  {}", snapshots);
    println!("  database   {}", database_path.display());

    let domains = store.articles.domain_counts()?;
    if !domains.is_empty() {
        println!("\n{}", style("Articles by domain").bold());
        for (domain, count) in domains.iter().take(10) {
            println!("  {:<32} {}", domain, count);
        }
    }

    if let Some(snapshot) = store.insights.latest()? {
        println!("\n{}", style("Latest snapshot").bold());
        println!(
            "  #{} generated {} ({})",
            snapshot.id,
            snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            format_age(Utc::now() - snapshot.generated_at)
        );
    }

    Ok(())
}

fn format_age(age: chrono::Duration) -> String {
    if age.num_days() > 0 {
        format!("{}d ago", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h ago", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{}m ago", age.num_minutes())
    } else {
        "just now".to_string()
    }
}
