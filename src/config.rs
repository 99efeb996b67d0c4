//! Configuration management for contentintel.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default database filename.
pub const DATABASE_FILENAME: &str = "content_intelligence.db";

/// Default crawl configuration filename.
pub const CONFIG_FILENAME: &str = "crawl.toml";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
}

impl Settings {
    /// Resolve the data directory: the `--target` flag wins, then the
    /// `CINTEL_DATA_DIR` environment variable, then the user default.
    pub fn resolve(target: Option<PathBuf>) -> Self {
        let data_dir = target
            .or_else(|| {
                std::env::var("CINTEL_DATA_DIR")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(default_data_dir);
        Self { data_dir }
    }

    /// Full path to the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILENAME)
    }

    /// Full path to the crawl configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILENAME)
    }

    /// Ensure all directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }
}

/// Default to ~/Documents/contentintel/ for user data.
/// Falls back gracefully: Documents dir -> Home dir -> Current dir.
fn default_data_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contentintel")
}

/// Crawl tuning, the `[crawl]` table of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// In-flight request ceiling across the whole pass.
    #[serde(default = "default_global_concurrency")]
    pub global_concurrency: usize,
    /// In-flight request ceiling within one site.
    #[serde(default = "default_per_host_concurrency")]
    pub per_host_concurrency: usize,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Minimum spacing between requests to one host, in milliseconds.
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,
    /// Article pages fetched per site per pass.
    #[serde(default = "default_max_pages_per_site")]
    pub max_pages_per_site: usize,
}

fn default_global_concurrency() -> usize {
    15
}

fn default_per_host_concurrency() -> usize {
    2
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_pacing_delay_ms() -> u64 {
    500
}

fn default_max_pages_per_site() -> usize {
    100
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            global_concurrency: default_global_concurrency(),
            per_host_concurrency: default_per_host_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            pacing_delay_ms: default_pacing_delay_ms(),
            max_pages_per_site: default_max_pages_per_site(),
        }
    }
}

impl CrawlConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}

/// One site to crawl, a `[[sites]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Seed URL; crawls stay on this URL's registrable domain.
    pub url: String,
    /// Display name. Defaults to the seed's host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Article URL patterns overriding the built-in set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub article_patterns: Vec<String>,
    /// Body container selectors tried before the built-in set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_selectors: Vec<String>,
}

impl SiteConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            name: None,
            article_patterns: Vec::new(),
            content_selectors: Vec::new(),
        }
    }

    /// Name for logs and progress output.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| self.url.clone())
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Crawl tuning.
    #[serde(default)]
    pub crawl: CrawlConfig,
    /// Sites to crawl.
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }

    /// Load configuration, or defaults when the file does not exist yet.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write configuration as TOML.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write config file '{}'", path.display()))
    }

    /// A starter configuration with a few health publishers to crawl.
    pub fn starter() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            sites: vec![
                SiteConfig::new("https://www.healthline.com"),
                SiteConfig::new("https://www.medicalnewstoday.com"),
                SiteConfig::new("https://www.menshealth.com"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [[sites]]
            url = "https://example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.crawl.global_concurrency, 15);
        assert_eq!(config.crawl.per_host_concurrency, 2);
        assert_eq!(config.crawl.request_timeout_secs, 10);
        assert_eq!(config.crawl.pacing_delay_ms, 500);
        assert_eq!(config.crawl.max_pages_per_site, 100);
        assert_eq!(config.sites.len(), 1);
        assert!(config.sites[0].article_patterns.is_empty());
    }

    #[test]
    fn site_overrides_parse() {
        let config: Config = toml::from_str(
            r##"
            [crawl]
            global_concurrency = 4

            [[sites]]
            url = "https://example.com"
            name = "Example"
            article_patterns = ["/stories/"]
            content_selectors = ["#story"]
            "##,
        )
        .unwrap();
        assert_eq!(config.crawl.global_concurrency, 4);
        assert_eq!(config.sites[0].display_name(), "Example");
        assert_eq!(config.sites[0].article_patterns, vec!["/stories/"]);
        assert_eq!(config.sites[0].content_selectors, vec!["#story"]);
    }

    #[test]
    fn display_name_falls_back_to_the_host() {
        let site = SiteConfig::new("https://www.healthline.com/nutrition");
        assert_eq!(site.display_name(), "www.healthline.com");
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.toml");
        let config = Config::starter();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.sites.len(), config.sites.len());
        assert_eq!(loaded.sites[0].url, config.sites[0].url);
        assert_eq!(loaded.crawl.max_pages_per_site, 100);
    }

    #[test]
    fn load_or_default_tolerates_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert!(config.sites.is_empty());
    }
}
