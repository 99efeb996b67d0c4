//! Article bundle writes.

use rusqlite::params;

use crate::models::ArticleBundle;

use super::ArticleRepository;
use crate::repository::Result;

impl ArticleRepository {
    /// Store an extracted bundle, replacing any prior record for the URL.
    ///
    /// The article row updates in place so its id survives re-scrapes, and
    /// every derived headline/keyword/signal row from the previous scrape is
    /// deleted before the new generation is inserted. One transaction covers
    /// the whole replacement: readers either see the old generation complete
    /// or the new one, never a mix.
    pub fn upsert_bundle(&self, bundle: &ArticleBundle) -> Result<i64> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let article = &bundle.article;
        let headings = serde_json::to_string(&article.headings)?;
        let keywords = serde_json::to_string(&article.keywords)?;

        tx.execute(
            r#"
            INSERT INTO articles (
                url, title, content, meta_description, word_count, headings,
                keywords, internal_links, external_links, image_count,
                source_domain, scraped_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                meta_description = excluded.meta_description,
                word_count = excluded.word_count,
                headings = excluded.headings,
                keywords = excluded.keywords,
                internal_links = excluded.internal_links,
                external_links = excluded.external_links,
                image_count = excluded.image_count,
                source_domain = excluded.source_domain,
                scraped_at = excluded.scraped_at
            "#,
            params![
                article.url,
                article.title,
                article.content,
                article.meta_description,
                article.word_count,
                headings,
                keywords,
                article.internal_links,
                article.external_links,
                article.image_count,
                article.source_domain,
                article.scraped_at.to_rfc3339(),
            ],
        )?;

        let article_id: i64 = tx.query_row(
            "SELECT id FROM articles WHERE url = ?1",
            params![article.url],
            |row| row.get(0),
        )?;

        // Derived rows are latest-generation only.
        tx.execute(
            "DELETE FROM headlines WHERE article_id = ?1",
            params![article_id],
        )?;
        tx.execute(
            "DELETE FROM keywords WHERE article_id = ?1",
            params![article_id],
        )?;
        tx.execute(
            "DELETE FROM content_signals WHERE article_id = ?1",
            params![article_id],
        )?;

        for headline in &bundle.headlines {
            let power_words = serde_json::to_string(&headline.power_words)?;
            tx.execute(
                r#"
                INSERT INTO headlines (article_id, headline, word_count, power_words, emotional_score)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    article_id,
                    headline.text,
                    headline.word_count,
                    power_words,
                    headline.emotional_score,
                ],
            )?;
        }

        for keyword in &bundle.keywords {
            tx.execute(
                "INSERT INTO keywords (article_id, keyword, frequency) VALUES (?1, ?2, ?3)",
                params![article_id, keyword.term, keyword.frequency],
            )?;
        }

        for signal in &bundle.signals {
            tx.execute(
                "INSERT INTO content_signals (article_id, kind, matched_text) VALUES (?1, ?2, ?3)",
                params![article_id, signal.kind.as_str(), signal.text],
            )?;
        }

        tx.commit()?;
        Ok(article_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::tempdir;

    use crate::models::{Article, ArticleBundle, ContentSignal, Headline, Keyword, SignalKind};

    use super::ArticleRepository;

    fn bundle(url: &str, title: &str, keyword: &str) -> ArticleBundle {
        ArticleBundle {
            article: Article {
                id: 0,
                url: url.to_string(),
                title: title.to_string(),
                content: format!("{keyword} body text"),
                meta_description: String::new(),
                word_count: 3,
                headings: Vec::new(),
                keywords: vec![keyword.to_string()],
                internal_links: 1,
                external_links: 0,
                image_count: 0,
                source_domain: "example.com".to_string(),
                scraped_at: Utc::now(),
            },
            headlines: vec![Headline {
                id: 0,
                article_id: 0,
                text: title.to_string(),
                word_count: title.split_whitespace().count() as u32,
                power_words: Vec::new(),
                emotional_score: 0.0,
            }],
            keywords: vec![Keyword {
                term: keyword.to_string(),
                frequency: 1,
            }],
            signals: vec![ContentSignal {
                kind: SignalKind::Cta,
                text: "learn more".to_string(),
            }],
        }
    }

    #[test]
    fn article_id_is_stable_across_reupserts() {
        let dir = tempdir().unwrap();
        let repo = ArticleRepository::new(dir.path().join("test.db")).unwrap();

        let first = repo
            .upsert_bundle(&bundle("https://example.com/article/a", "First", "alpha"))
            .unwrap();
        let second = repo
            .upsert_bundle(&bundle("https://example.com/article/a", "Second", "beta"))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reupsert_leaves_no_orphaned_derived_rows() {
        let dir = tempdir().unwrap();
        let repo = ArticleRepository::new(dir.path().join("test.db")).unwrap();
        let url = "https://example.com/article/a";

        repo.upsert_bundle(&bundle(url, "First", "alpha")).unwrap();
        repo.upsert_bundle(&bundle(url, "Second", "beta")).unwrap();

        let headlines = repo.top_headlines(10).unwrap();
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].text, "Second");

        let keywords = repo.keyword_frequency(10).unwrap();
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "beta");

        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn upserting_one_url_never_touches_another() {
        let dir = tempdir().unwrap();
        let repo = ArticleRepository::new(dir.path().join("test.db")).unwrap();

        repo.upsert_bundle(&bundle("https://example.com/article/a", "Kept", "alpha"))
            .unwrap();
        repo.upsert_bundle(&bundle("https://example.com/article/b", "Other", "beta"))
            .unwrap();
        repo.upsert_bundle(&bundle("https://example.com/article/b", "Other v2", "gamma"))
            .unwrap();

        let kept = repo
            .get_by_url("https://example.com/article/a")
            .unwrap()
            .unwrap();
        assert_eq!(kept.title, "Kept");
        assert_eq!(kept.keywords, vec!["alpha".to_string()]);
        assert_eq!(repo.count().unwrap(), 2);
    }
}
