//! Article lookup and listing operations.

use rusqlite::{params, Row};

use crate::models::{Article, ContentSignal, SignalKind};

use super::ArticleRepository;
use crate::repository::helpers::{parse_json, parse_timestamp, OptionalExt};
use crate::repository::Result;

const ARTICLE_COLUMNS: &str = "id, url, title, content, meta_description, word_count, headings, \
     keywords, internal_links, external_links, image_count, source_domain, scraped_at";

fn article_from_row(row: &Row) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get("id")?,
        url: row.get("url")?,
        title: row.get("title")?,
        content: row.get("content")?,
        meta_description: row.get("meta_description")?,
        word_count: row.get("word_count")?,
        headings: parse_json(row.get::<_, String>("headings")?)?,
        keywords: parse_json(row.get::<_, String>("keywords")?)?,
        internal_links: row.get("internal_links")?,
        external_links: row.get("external_links")?,
        image_count: row.get("image_count")?,
        source_domain: row.get("source_domain")?,
        scraped_at: parse_timestamp(row.get::<_, String>("scraped_at")?)?,
    })
}

impl ArticleRepository {
    /// Look up one article by its URL.
    pub fn get_by_url(&self, url: &str) -> Result<Option<Article>> {
        let conn = self.connect()?;
        let article = conn
            .query_row(
                &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE url = ?1"),
                params![url],
                article_from_row,
            )
            .optional()?;
        Ok(article)
    }

    /// Articles scraped from one source domain, newest first.
    pub fn list_by_domain(&self, domain: &str, limit: u32) -> Result<Vec<Article>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles
             WHERE source_domain = ?1
             ORDER BY scraped_at DESC, id DESC
             LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![domain, limit], article_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The N most recently scraped articles.
    pub fn list_recent(&self, limit: u32) -> Result<Vec<Article>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles
             ORDER BY scraped_at DESC, id DESC
             LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit], article_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Detected signal rows for one article, in detection order. Unknown
    /// kinds from older generations are skipped.
    pub fn signals_by_url(&self, url: &str) -> Result<Vec<ContentSignal>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT s.kind, s.matched_text
             FROM content_signals s
             JOIN articles a ON a.id = s.article_id
             WHERE a.url = ?1
             ORDER BY s.id ASC",
        )?;
        let rows = stmt.query_map(params![url], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut signals = Vec::new();
        for row in rows {
            let (kind, text) = row?;
            if let Some(kind) = SignalKind::from_str(&kind) {
                signals.push(ContentSignal { kind, text });
            }
        }
        Ok(signals)
    }

    /// Total number of stored articles.
    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count)
    }
}
