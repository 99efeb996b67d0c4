//! Initialize command.

use std::path::Path;

use console::style;

use crate::config::{Config, Settings};
use crate::repository::ContentStore;

/// Initialize the data directory, database, and starter config.
pub fn cmd_init(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    if config_path.exists() {
        println!(
            "{} Config already present: {}",
            style("!").yellow(),
            config_path.display()
        );
    } else {
        Config::starter().save(config_path)?;
        println!(
            "  {} Wrote starter config: {}",
            style("✓").green(),
            config_path.display()
        );
    }

    // Opening the store creates the database and its schema.
    ContentStore::open(&settings.database_path())?;

    println!(
        "{} Initialized contentintel in {}",
        style("✓").green(),
        settings.data_dir.display()
    );
    println!(
        "  Edit {} and run: cintel crawl",
        config_path.display()
    );

    Ok(())
}
