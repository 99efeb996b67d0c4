//! Corpus aggregation into insight snapshots.

use std::path::Path;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::models::InsightSnapshot;
use crate::repository::{ArticleRepository, InsightRepository, StoreError};

/// Headlines carried into a snapshot, best-scoring first.
pub const SNAPSHOT_HEADLINE_LIMIT: u32 = 50;
/// Keyword rows carried into a snapshot, most frequent first.
pub const SNAPSHOT_KEYWORD_LIMIT: u32 = 20;

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("failed to read the article corpus")]
    Collect(#[source] StoreError),
    #[error("failed to publish the snapshot")]
    Publish(#[source] StoreError),
    #[error("failed to encode the snapshot")]
    Encode(#[from] serde_json::Error),
    #[error("failed to export the snapshot")]
    Export(#[from] std::io::Error),
}

/// Builds insight snapshots from whatever the corpus currently holds.
pub struct InsightService {
    articles: ArticleRepository,
    insights: InsightRepository,
}

impl InsightService {
    pub fn new(articles: ArticleRepository, insights: InsightRepository) -> Self {
        Self { articles, insights }
    }

    /// Aggregate the corpus and publish a new snapshot. Reads nothing but
    /// the article store and writes nothing but the snapshot row, so a
    /// failed run leaves the previous snapshot current.
    pub fn run(&self) -> Result<InsightSnapshot, AggregationError> {
        let (headlines, keyword_frequency, average_metrics) = self
            .articles
            .snapshot_inputs(SNAPSHOT_HEADLINE_LIMIT, SNAPSHOT_KEYWORD_LIMIT)
            .map_err(AggregationError::Collect)?;

        let mut snapshot = InsightSnapshot {
            id: 0,
            generated_at: Utc::now(),
            top_headlines: headlines.into_iter().map(|h| h.text).collect(),
            keyword_frequency,
            average_metrics,
        };
        snapshot.id = self
            .insights
            .save(&snapshot)
            .map_err(AggregationError::Publish)?;

        info!(
            headlines = snapshot.top_headlines.len(),
            keywords = snapshot.keyword_frequency.len(),
            "published insight snapshot"
        );
        Ok(snapshot)
    }

    /// Write a snapshot to disk as pretty-printed JSON.
    pub fn export_json(snapshot: &InsightSnapshot, path: &Path) -> Result<(), AggregationError> {
        let encoded = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(path, encoded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, ArticleBundle};
    use crate::repository::ContentStore;
    use chrono::Utc;

    fn bundle(url: &str, words: u32) -> ArticleBundle {
        ArticleBundle {
            article: Article {
                id: 0,
                url: url.to_string(),
                title: "t".to_string(),
                content: "c".to_string(),
                meta_description: String::new(),
                word_count: words,
                headings: Vec::new(),
                keywords: Vec::new(),
                internal_links: 0,
                external_links: 0,
                image_count: 0,
                source_domain: "example.com".to_string(),
                scraped_at: Utc::now(),
            },
            headlines: Vec::new(),
            keywords: Vec::new(),
            signals: Vec::new(),
        }
    }

    #[test]
    fn empty_corpus_still_publishes_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(&dir.path().join("content.db")).unwrap();
        let service = InsightService::new(store.articles.clone(), store.insights.clone());

        let snapshot = service.run().unwrap();
        assert!(snapshot.id > 0);
        assert!(snapshot.top_headlines.is_empty());
        assert_eq!(snapshot.average_metrics.word_count, 0.0);
        assert_eq!(store.insights.latest().unwrap().unwrap().id, snapshot.id);
    }

    #[test]
    fn repeated_runs_append_snapshots_without_touching_articles() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(&dir.path().join("content.db")).unwrap();
        store.articles.upsert_bundle(&bundle("https://example.com/a", 100)).unwrap();
        let service = InsightService::new(store.articles.clone(), store.insights.clone());

        let first = service.run().unwrap();
        let second = service.run().unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.average_metrics, second.average_metrics);
        assert_eq!(store.articles.count().unwrap(), 1);
        assert_eq!(store.insights.history(10).unwrap().len(), 2);
    }
}
