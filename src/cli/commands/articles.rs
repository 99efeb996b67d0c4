//! Article inspection commands.

use anyhow::bail;
use console::style;

use crate::config::Settings;
use crate::repository::ContentStore;

/// List stored articles, newest first.
pub fn cmd_ls(settings: &Settings, domain: Option<&str>, limit: u32) -> anyhow::Result<()> {
    let store = ContentStore::open(&settings.database_path())?;
    let articles = match domain {
        Some(domain) => store.articles.list_by_domain(domain, limit)?,
        None => store.articles.list_recent(limit)?,
    };

    if articles.is_empty() {
        println!("{} No articles stored yet; run: cintel crawl", style("!").yellow());
        return Ok(());
    }

    println!(
        "{:<16}  {:<28}  {:>6}  TITLE",
        "SCRAPED", "DOMAIN", "WORDS"
    );
    for article in &articles {
        println!(
            "{:<16}  {:<28}  {:>6}  {}",
            article.scraped_at.format("%Y-%m-%d %H:%M"),
            truncated(&article.source_domain, 28),
            article.word_count,
            truncated(&article.title, 60)
        );
    }
    println!("\n{} article(s)", articles.len());

    Ok(())
}

/// Show one stored article in full.
pub fn cmd_show(settings: &Settings, url: &str) -> anyhow::Result<()> {
    let store = ContentStore::open(&settings.database_path())?;
    let article = match store.articles.get_by_url(url)? {
        Some(article) => article,
        None => bail!("no article stored for {}", url),
    };

    println!("{}", style(&article.title).bold());
    println!("{}", article.url);
    println!();
    println!("domain       {}", article.source_domain);
    println!(
        "scraped      {}",
        article.scraped_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("words        {}", article.word_count);
    println!(
        "links        {} internal, {} external",
        article.internal_links, article.external_links
    );
    println!("images       {}", article.image_count);
    if !article.meta_description.is_empty() {
        println!("description  {}", article.meta_description);
    }
    if !article.keywords.is_empty() {
        println!("keywords     {}", article.keywords.join(", "));
    }

    if !article.headings.is_empty() {
        println!();
        println!("{}", style("Headings").bold());
        for heading in &article.headings {
            println!("  h{} {}", heading.level, heading.text);
        }
    }

    let signals = store.articles.signals_by_url(url)?;
    if !signals.is_empty() {
        println!();
        println!("{}", style("Signals").bold());
        for signal in &signals {
            println!("  {:<12} {}", signal.kind.as_str(), signal.text);
        }
    }

    Ok(())
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
