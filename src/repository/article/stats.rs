//! Corpus aggregation and statistics operations.

use rusqlite::{params, Connection};

use crate::models::{AverageMetrics, Headline, KeywordCount};

use super::ArticleRepository;
use crate::repository::helpers::parse_json;
use crate::repository::Result;

impl ArticleRepository {
    /// Headlines ordered by emotional score descending, insertion order on
    /// ties.
    pub fn top_headlines(&self, limit: u32) -> Result<Vec<Headline>> {
        let conn = self.connect()?;
        Self::top_headlines_on(&conn, limit)
    }

    /// Corpus keyword frequencies: per-article frequencies summed by term.
    pub fn keyword_frequency(&self, limit: u32) -> Result<Vec<KeywordCount>> {
        let conn = self.connect()?;
        Self::keyword_frequency_on(&conn, limit)
    }

    /// Averages over all stored articles; zeros for an empty corpus.
    pub fn average_metrics(&self) -> Result<AverageMetrics> {
        let conn = self.connect()?;
        Self::average_metrics_on(&conn)
    }

    /// All three aggregation inputs, read inside one transaction so the
    /// caller sees the corpus at a single point in time.
    pub fn snapshot_inputs(
        &self,
        headline_limit: u32,
        keyword_limit: u32,
    ) -> Result<(Vec<Headline>, Vec<KeywordCount>, AverageMetrics)> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let headlines = Self::top_headlines_on(&tx, headline_limit)?;
        let keywords = Self::keyword_frequency_on(&tx, keyword_limit)?;
        let averages = Self::average_metrics_on(&tx)?;
        tx.commit()?;
        Ok((headlines, keywords, averages))
    }

    /// Article counts per source domain, busiest first.
    pub fn domain_counts(&self) -> Result<Vec<(String, u64)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT source_domain, COUNT(*) AS total
             FROM articles
             GROUP BY source_domain
             ORDER BY total DESC, source_domain ASC",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get("source_domain")?, row.get("total")?)))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn top_headlines_on(conn: &Connection, limit: u32) -> Result<Vec<Headline>> {
        let mut stmt = conn.prepare(
            "SELECT id, article_id, headline, word_count, power_words, emotional_score
             FROM headlines
             ORDER BY emotional_score DESC, id ASC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(Headline {
                id: row.get("id")?,
                article_id: row.get("article_id")?,
                text: row.get("headline")?,
                word_count: row.get("word_count")?,
                power_words: parse_json(row.get::<_, String>("power_words")?)?,
                emotional_score: row.get("emotional_score")?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn keyword_frequency_on(conn: &Connection, limit: u32) -> Result<Vec<KeywordCount>> {
        let mut stmt = conn.prepare(
            "SELECT keyword, SUM(frequency) AS total
             FROM keywords
             GROUP BY keyword
             ORDER BY total DESC, keyword ASC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(KeywordCount {
                keyword: row.get("keyword")?,
                count: row.get("total")?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn average_metrics_on(conn: &Connection) -> Result<AverageMetrics> {
        let metrics = conn.query_row(
            "SELECT
                COALESCE(AVG(word_count), 0.0) AS avg_words,
                COALESCE(AVG(internal_links), 0.0) AS avg_internal,
                COALESCE(AVG(external_links), 0.0) AS avg_external,
                COALESCE(AVG(image_count), 0.0) AS avg_images
             FROM articles",
            [],
            |row| {
                Ok(AverageMetrics {
                    word_count: row.get("avg_words")?,
                    internal_links: row.get("avg_internal")?,
                    external_links: row.get("avg_external")?,
                    images: row.get("avg_images")?,
                })
            },
        )?;
        Ok(metrics)
    }
}
