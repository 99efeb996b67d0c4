//! Database schema initialization.

use super::ArticleRepository;
use crate::repository::Result;

impl ArticleRepository {
    pub(crate) fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                meta_description TEXT NOT NULL DEFAULT '',
                word_count INTEGER NOT NULL DEFAULT 0,
                headings TEXT NOT NULL DEFAULT '[]',
                keywords TEXT NOT NULL DEFAULT '[]',
                internal_links INTEGER NOT NULL DEFAULT 0,
                external_links INTEGER NOT NULL DEFAULT 0,
                image_count INTEGER NOT NULL DEFAULT 0,
                source_domain TEXT NOT NULL DEFAULT '',
                scraped_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS headlines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                article_id INTEGER NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
                headline TEXT NOT NULL,
                word_count INTEGER NOT NULL DEFAULT 0,
                power_words TEXT NOT NULL DEFAULT '[]',
                emotional_score REAL NOT NULL DEFAULT 0.0
            );

            CREATE TABLE IF NOT EXISTS keywords (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                article_id INTEGER NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
                keyword TEXT NOT NULL,
                frequency INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS content_signals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                article_id INTEGER NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
                kind TEXT NOT NULL,
                matched_text TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_articles_domain ON articles(source_domain);
            CREATE INDEX IF NOT EXISTS idx_articles_scraped_at ON articles(scraped_at);
            CREATE INDEX IF NOT EXISTS idx_headlines_article ON headlines(article_id);
            CREATE INDEX IF NOT EXISTS idx_headlines_score ON headlines(emotional_score DESC);
            CREATE INDEX IF NOT EXISTS idx_keywords_article ON keywords(article_id);
            CREATE INDEX IF NOT EXISTS idx_keywords_term ON keywords(keyword);
            CREATE INDEX IF NOT EXISTS idx_signals_article ON content_signals(article_id);
            "#,
        )?;
        Ok(())
    }
}
