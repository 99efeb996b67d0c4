//! Corpus-level insight snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One keyword with its frequency summed across the whole corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
}

/// Averages over every stored article.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub word_count: f64,
    pub internal_links: f64,
    pub external_links: f64,
    pub images: f64,
}

/// An immutable corpus summary produced by one aggregation run.
///
/// Snapshots are append-only and versioned by `generated_at`; the snapshot
/// with the greatest timestamp is the current one. Serializing a snapshot
/// yields the JSON artifact downstream consumers read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSnapshot {
    /// Database ID (0 if not yet saved)
    #[serde(skip)]
    pub id: i64,
    /// Generation timestamp, unique per snapshot
    pub generated_at: DateTime<Utc>,
    /// Top headline texts, highest emotional score first
    pub top_headlines: Vec<String>,
    /// Corpus keyword frequencies, highest first
    pub keyword_frequency: Vec<KeywordCount>,
    /// Averages over all articles at generation time
    pub average_metrics: AverageMetrics,
}
