//! Append-only insight snapshot persistence.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Row};

use crate::models::{AverageMetrics, InsightSnapshot};

use super::helpers::{parse_json, parse_timestamp, OptionalExt};
use super::Result;

/// Snapshots are immutable once written; saving only ever appends. The
/// latest snapshot is the one with the greatest generation timestamp.
#[derive(Debug, Clone)]
pub struct InsightRepository {
    db_path: PathBuf,
}

impl InsightRepository {
    /// Open the repository, creating the schema if needed.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let repo = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    fn connect(&self) -> Result<Connection> {
        super::connect(&self.db_path)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS insight_snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                generated_at TEXT NOT NULL UNIQUE,
                top_headlines TEXT NOT NULL DEFAULT '[]',
                keyword_frequency TEXT NOT NULL DEFAULT '[]',
                avg_word_count REAL NOT NULL DEFAULT 0.0,
                avg_internal_links REAL NOT NULL DEFAULT 0.0,
                avg_external_links REAL NOT NULL DEFAULT 0.0,
                avg_images REAL NOT NULL DEFAULT 0.0
            );

            CREATE INDEX IF NOT EXISTS idx_snapshots_generated
                ON insight_snapshots(generated_at DESC);
            "#,
        )?;
        Ok(())
    }

    /// Append a snapshot and return its row id.
    pub fn save(&self, snapshot: &InsightSnapshot) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO insight_snapshots (
                generated_at, top_headlines, keyword_frequency,
                avg_word_count, avg_internal_links, avg_external_links, avg_images
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                snapshot.generated_at.to_rfc3339(),
                serde_json::to_string(&snapshot.top_headlines)?,
                serde_json::to_string(&snapshot.keyword_frequency)?,
                snapshot.average_metrics.word_count,
                snapshot.average_metrics.internal_links,
                snapshot.average_metrics.external_links,
                snapshot.average_metrics.images,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The current snapshot, if any run has published one.
    pub fn latest(&self) -> Result<Option<InsightSnapshot>> {
        let conn = self.connect()?;
        let snapshot = conn
            .query_row(
                &format!(
                    "SELECT {SNAPSHOT_COLUMNS} FROM insight_snapshots
                     ORDER BY generated_at DESC
                     LIMIT 1"
                ),
                [],
                snapshot_from_row,
            )
            .optional()?;
        Ok(snapshot)
    }

    /// Snapshot history, newest first.
    pub fn history(&self, limit: u32) -> Result<Vec<InsightSnapshot>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM insight_snapshots
             ORDER BY generated_at DESC
             LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit], snapshot_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Total number of published snapshots.
    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: u64 =
            conn.query_row("SELECT COUNT(*) FROM insight_snapshots", [], |row| row.get(0))?;
        Ok(count)
    }
}

const SNAPSHOT_COLUMNS: &str = "id, generated_at, top_headlines, keyword_frequency, \
     avg_word_count, avg_internal_links, avg_external_links, avg_images";

fn snapshot_from_row(row: &Row) -> rusqlite::Result<InsightSnapshot> {
    Ok(InsightSnapshot {
        id: row.get("id")?,
        generated_at: parse_timestamp(row.get::<_, String>("generated_at")?)?,
        top_headlines: parse_json(row.get::<_, String>("top_headlines")?)?,
        keyword_frequency: parse_json(row.get::<_, String>("keyword_frequency")?)?,
        average_metrics: AverageMetrics {
            word_count: row.get("avg_word_count")?,
            internal_links: row.get("avg_internal_links")?,
            external_links: row.get("avg_external_links")?,
            images: row.get("avg_images")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    use crate::models::{AverageMetrics, InsightSnapshot, KeywordCount};

    use super::InsightRepository;

    fn snapshot(hours_ago: i64, headline: &str) -> InsightSnapshot {
        InsightSnapshot {
            id: 0,
            generated_at: Utc::now() - Duration::hours(hours_ago),
            top_headlines: vec![headline.to_string()],
            keyword_frequency: vec![KeywordCount {
                keyword: "energy".to_string(),
                count: 3,
            }],
            average_metrics: AverageMetrics {
                word_count: 1200.0,
                internal_links: 3.0,
                external_links: 1.0,
                images: 2.0,
            },
        }
    }

    #[test]
    fn latest_is_the_newest_snapshot() {
        let dir = tempdir().unwrap();
        let repo = InsightRepository::new(dir.path().join("test.db")).unwrap();
        assert!(repo.latest().unwrap().is_none());

        repo.save(&snapshot(24, "Older")).unwrap();
        repo.save(&snapshot(1, "Newer")).unwrap();

        let latest = repo.latest().unwrap().unwrap();
        assert_eq!(latest.top_headlines, vec!["Newer".to_string()]);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn history_is_newest_first_and_capped() {
        let dir = tempdir().unwrap();
        let repo = InsightRepository::new(dir.path().join("test.db")).unwrap();
        for i in 0..3 {
            repo.save(&snapshot(i * 10, &format!("Snapshot {i}"))).unwrap();
        }

        let history = repo.history(2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].top_headlines, vec!["Snapshot 0".to_string()]);
        assert_eq!(history[1].top_headlines, vec!["Snapshot 1".to_string()]);
    }

    #[test]
    fn snapshots_round_trip_their_payload() {
        let dir = tempdir().unwrap();
        let repo = InsightRepository::new(dir.path().join("test.db")).unwrap();
        let original = snapshot(0, "Boost Energy");
        repo.save(&original).unwrap();

        let stored = repo.latest().unwrap().unwrap();
        assert_eq!(stored.generated_at, original.generated_at);
        assert_eq!(stored.keyword_frequency, original.keyword_frequency);
        assert_eq!(stored.average_metrics, original.average_metrics);
    }
}
