//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod aggregate;
mod articles;
mod crawl;
mod init;
mod insights;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "cintel")]
#[command(about = "Content intelligence acquisition and insight system")]
#[command(version)]
pub struct Cli {
    /// Data directory (overrides CINTEL_DATA_DIR and the default)
    #[arg(long, short = 't', global = true)]
    target: Option<PathBuf>,

    /// Config file path (defaults to crawl.toml in the data directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory, database, and starter config
    Init,

    /// Crawl configured sites and store the articles they yield
    Crawl {
        /// Site names or URLs to crawl (all configured sites if omitted)
        sites: Vec<String>,
        /// Limit article pages per site (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Aggregate the corpus into a new insight snapshot
    Aggregate {
        /// Also write the snapshot to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect stored articles
    Articles {
        #[command(subcommand)]
        command: ArticlesCommands,
    },

    /// Inspect insight snapshots
    Insights {
        #[command(subcommand)]
        command: InsightsCommands,
    },

    /// Show corpus and snapshot totals
    Status,
}

#[derive(Subcommand)]
enum ArticlesCommands {
    /// List stored articles
    Ls {
        /// Filter by source domain
        #[arg(short, long)]
        domain: Option<String>,
        /// Limit number of results
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
    /// Show one article in full
    Show {
        /// Article URL
        url: String,
    },
}

#[derive(Subcommand)]
enum InsightsCommands {
    /// Show the latest snapshot
    Latest,
    /// List snapshots, newest first
    History {
        /// Limit number of results
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::resolve(cli.target);
    let config_path = cli.config.unwrap_or_else(|| settings.config_path());

    match cli.command {
        Commands::Init => init::cmd_init(&settings, &config_path),
        Commands::Crawl { sites, limit } => {
            crawl::cmd_crawl(&settings, &config_path, &sites, limit).await
        }
        Commands::Aggregate { output } => aggregate::cmd_aggregate(&settings, output.as_deref()),
        Commands::Articles { command } => match command {
            ArticlesCommands::Ls { domain, limit } => {
                articles::cmd_ls(&settings, domain.as_deref(), limit)
            }
            ArticlesCommands::Show { url } => articles::cmd_show(&settings, &url),
        },
        Commands::Insights { command } => match command {
            InsightsCommands::Latest => insights::cmd_latest(&settings),
            InsightsCommands::History { limit } => insights::cmd_history(&settings, limit),
        },
        Commands::Status => status::cmd_status(&settings),
    }
}
