//! Pure markup-to-record extraction.
//!
//! Extraction never fails: empty or malformed markup degrades to empty and
//! zeroed fields. The title is read from the full tree; body text, headings,
//! link counts, and image counts all ignore script/style/nav/footer/header
//! subtrees.

pub mod signals;

use std::collections::HashMap;

use chrono::Utc;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use crate::models::{Article, ArticleBundle, Heading, Headline, Keyword};

/// Content containers tried in order; the first match wins.
const DEFAULT_CONTENT_SELECTORS: [&str; 5] = [
    "article",
    r#"[class*="article"]"#,
    r#"[class*="content"]"#,
    r#"[class*="post"]"#,
    "main",
];

/// Subtrees ignored when reading body text and derived counts.
const CHROME_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Keywords kept per article.
const KEYWORD_LIMIT: usize = 20;

/// Turns one fetched page into an article bundle.
#[derive(Debug, Clone)]
pub struct Extractor {
    content_selectors: Vec<Selector>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&DEFAULT_CONTENT_SELECTORS)
    }
}

impl Extractor {
    /// Build an extractor with an ordered content-selector list, e.g. from a
    /// site's extraction hints. Invalid selectors are skipped; when none
    /// survive, the defaults apply.
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Self {
        let mut compiled = Vec::new();
        for raw in selectors {
            match Selector::parse(raw.as_ref()) {
                Ok(selector) => compiled.push(selector),
                Err(_) => {
                    warn!(selector = raw.as_ref(), "skipping invalid content selector");
                }
            }
        }
        if compiled.is_empty() {
            for raw in DEFAULT_CONTENT_SELECTORS {
                if let Ok(selector) = Selector::parse(raw) {
                    compiled.push(selector);
                }
            }
        }
        Self {
            content_selectors: compiled,
        }
    }

    /// Extract the article record and every derived row from one page.
    pub fn extract(&self, url: &str, html: &str) -> ArticleBundle {
        let document = Html::parse_document(html);

        let title = extract_title(&document);
        let content = self.extract_content(&document);
        let meta_description = extract_meta_description(&document);
        let headings = collect_headings(&document);
        let (internal_links, external_links) = count_links(&document, url);
        let image_count = count_images(&document);

        let word_count = content.split_whitespace().count() as u32;
        let keywords = extract_keywords(&content);
        let power_words = signals::detect_power_words(&content);
        let emotional_score = signals::emotional_polarity(&content);
        let detected = signals::scan_signals(&content);

        let source_domain = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|s| s.to_string()))
            .unwrap_or_default();

        let article = Article {
            id: 0,
            url: url.to_string(),
            title: title.clone(),
            content,
            meta_description,
            word_count,
            headings,
            keywords: keywords.iter().map(|k| k.term.clone()).collect(),
            internal_links,
            external_links,
            image_count,
            source_domain,
            scraped_at: Utc::now(),
        };

        // The title doubles as the article's scored headline; its power
        // words and polarity come from the body it fronts.
        let headlines = if title.is_empty() {
            Vec::new()
        } else {
            vec![Headline {
                id: 0,
                article_id: 0,
                word_count: title.split_whitespace().count() as u32,
                text: title,
                power_words,
                emotional_score,
            }]
        };

        ArticleBundle {
            article,
            headlines,
            keywords,
            signals: detected,
        }
    }

    fn extract_content(&self, document: &Html) -> String {
        for selector in &self.content_selectors {
            let candidate = document
                .select(selector)
                .find(|el| !is_chrome(el) && !inside_chrome(el));
            if let Some(element) = candidate {
                let mut text = String::new();
                collect_text(element, &mut text);
                return text;
            }
        }
        let mut text = String::new();
        collect_text(document.root_element(), &mut text);
        text
    }
}

/// Top keywords by in-article frequency: lowercase alphabetic tokens of
/// length >= 4, ties broken by first encounter.
pub fn extract_keywords(text: &str) -> Vec<Keyword> {
    let pattern = match Regex::new(r"\b[a-z]{4,}\b") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    let lower = text.to_lowercase();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<Keyword> = Vec::new();
    for token in pattern.find_iter(&lower) {
        match index.get(token.as_str()) {
            Some(&at) => counts[at].frequency += 1,
            None => {
                index.insert(token.as_str().to_string(), counts.len());
                counts.push(Keyword {
                    term: token.as_str().to_string(),
                    frequency: 1,
                });
            }
        }
    }
    // Stable sort keeps first-encounter order within equal frequencies.
    counts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    counts.truncate(KEYWORD_LIMIT);
    counts
}

fn extract_title(document: &Html) -> String {
    for tag in ["h1", "title"] {
        if let Ok(selector) = Selector::parse(tag) {
            if let Some(element) = document.select(&selector).next() {
                return element.text().collect::<String>().trim().to_string();
            }
        }
    }
    String::new()
}

fn extract_meta_description(document: &Html) -> String {
    if let Ok(selector) = Selector::parse(r#"meta[name="description"]"#) {
        if let Some(element) = document.select(&selector).next() {
            if let Some(content) = element.value().attr("content") {
                return content.to_string();
            }
        }
    }
    String::new()
}

fn collect_headings(document: &Html) -> Vec<Heading> {
    let selector = match Selector::parse("h1, h2, h3, h4, h5, h6") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let mut headings = Vec::new();
    for element in document.select(&selector) {
        if inside_chrome(&element) {
            continue;
        }
        let level = match element.value().name() {
            "h1" => 1,
            "h2" => 2,
            "h3" => 3,
            "h4" => 4,
            "h5" => 5,
            _ => 6,
        };
        headings.push(Heading {
            level,
            text: element.text().collect::<String>().trim().to_string(),
        });
    }
    headings
}

fn count_links(document: &Html, page_url: &str) -> (u32, u32) {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return (0, 0),
    };
    let page_host = match base.host_str() {
        Some(host) => host.to_string(),
        None => return (0, 0),
    };
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return (0, 0),
    };

    let mut internal = 0u32;
    let mut external = 0u32;
    for element in document.select(&selector) {
        if inside_chrome(&element) {
            continue;
        }
        let href = match element.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        if let Ok(resolved) = base.join(href) {
            match resolved.host_str() {
                Some(host) if host == page_host => internal += 1,
                Some(_) if matches!(resolved.scheme(), "http" | "https") => external += 1,
                _ => {}
            }
        }
    }
    (internal, external)
}

fn count_images(document: &Html) -> u32 {
    match Selector::parse("img") {
        Ok(selector) => document
            .select(&selector)
            .filter(|el| !inside_chrome(el))
            .count() as u32,
        Err(_) => 0,
    }
}

fn is_chrome(element: &ElementRef) -> bool {
    CHROME_TAGS.contains(&element.value().name())
}

fn inside_chrome(element: &ElementRef) -> bool {
    element.ancestors().any(|ancestor| {
        ancestor
            .value()
            .as_element()
            .map(|el| CHROME_TAGS.contains(&el.name()))
            .unwrap_or(false)
    })
}

/// Descendant text joined with single spaces, skipping chrome subtrees.
fn collect_text(element: ElementRef, out: &mut String) {
    if is_chrome(&element) {
        return;
    }
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(trimmed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h1_wins_over_title_tag() {
        let html = "<html><head><title>Tag Title</title></head><body><h1>Heading Title</h1></body></html>";
        let bundle = Extractor::default().extract("https://example.com/article/a", html);
        assert_eq!(bundle.article.title, "Heading Title");

        let html = "<html><head><title>Tag Title</title></head><body><p>text</p></body></html>";
        let bundle = Extractor::default().extract("https://example.com/article/a", html);
        assert_eq!(bundle.article.title, "Tag Title");
    }

    #[test]
    fn empty_markup_degrades_to_zeroed_fields() {
        let bundle = Extractor::default().extract("https://example.com/article/a", "");
        assert_eq!(bundle.article.title, "");
        assert_eq!(bundle.article.word_count, 0);
        assert!(bundle.article.headings.is_empty());
        assert!(bundle.article.keywords.is_empty());
        assert!(bundle.headlines.is_empty());
        assert!(bundle.keywords.is_empty());
        assert_eq!(bundle.article.source_domain, "example.com");
    }

    #[test]
    fn content_comes_from_the_first_matching_container() {
        let html = r#"<html><body>
            <div class="sidebar-content">sidebar words</div>
            <article>article words here</article>
            <main>main words</main>
        </body></html>"#;
        let bundle = Extractor::default().extract("https://example.com/article/a", html);
        assert_eq!(bundle.article.content, "article words here");

        let html = r#"<html><body><div class="post-body">post words</div></body></html>"#;
        let bundle = Extractor::default().extract("https://example.com/article/a", html);
        assert_eq!(bundle.article.content, "post words");
    }

    #[test]
    fn falls_back_to_whole_document_text() {
        let html = "<html><body><p>alpha</p><p>beta</p></body></html>";
        let bundle = Extractor::default().extract("https://example.com/article/a", html);
        assert_eq!(bundle.article.content, "alpha beta");
    }

    #[test]
    fn chrome_subtrees_are_invisible_to_body_and_counts() {
        let html = r#"<html><body>
            <header><h1>Masthead</h1><a href="/promo">promo</a><img src="/logo.png"></header>
            <nav><a href="/section">section</a></nav>
            <article>
                <h2>Real Section</h2>
                real words
                <a href="/article/next">next</a>
                <a href="https://elsewhere.example.net/ref">ref</a>
                <img src="/photo.jpg">
            </article>
            <footer><a href="/legal">legal</a></footer>
        </body></html>"#;
        let bundle = Extractor::default().extract("https://example.com/article/a", html);

        // The title still reads from the full tree.
        assert_eq!(bundle.article.title, "Masthead");
        // Headings, links, and images do not.
        assert_eq!(
            bundle.article.headings,
            vec![Heading {
                level: 2,
                text: "Real Section".to_string()
            }]
        );
        assert_eq!(bundle.article.internal_links, 1);
        assert_eq!(bundle.article.external_links, 1);
        assert_eq!(bundle.article.image_count, 1);
        assert!(!bundle.article.content.contains("promo"));
    }

    #[test]
    fn headings_keep_document_order() {
        let html = r#"<html><body><main>
            <h2>Second Level First</h2>
            <h1>Top Level Later</h1>
            <h3>Third</h3>
        </main></body></html>"#;
        let bundle = Extractor::default().extract("https://example.com/article/a", html);
        let levels: Vec<u8> = bundle.article.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![2, 1, 3]);
    }

    #[test]
    fn keyword_extraction_is_idempotent_with_stable_ties() {
        let text = "zebra zebra apple apple mango grape";
        let first = extract_keywords(text);
        let second = extract_keywords(text);
        assert_eq!(first, second);

        let terms: Vec<&str> = first.iter().map(|k| k.term.as_str()).collect();
        // Ties (apple/zebra at 2, mango/grape at 1) keep first-encounter order.
        assert_eq!(terms, vec!["zebra", "apple", "mango", "grape"]);
        assert_eq!(first[0].frequency, 2);
    }

    #[test]
    fn keywords_skip_short_tokens_and_cap_at_twenty() {
        let short = extract_keywords("the cat sat on a mat");
        assert!(short.is_empty());

        let mut text = String::new();
        for i in 0..25u8 {
            let suffix = (b'a' + i) as char;
            let word = format!("keyword{suffix}{suffix} ");
            // Earlier words repeat more so the cap keeps the first twenty.
            for _ in 0..(25 - i) {
                text.push_str(&word);
            }
        }
        let keywords = extract_keywords(&text);
        assert_eq!(keywords.len(), 20);
        assert_eq!(keywords[0].term, "keywordaa");
    }

    #[test]
    fn meta_description_defaults_to_empty() {
        let html = r#"<html><head><meta name="description" content="A daily habit guide"></head><body></body></html>"#;
        let bundle = Extractor::default().extract("https://example.com/article/a", html);
        assert_eq!(bundle.article.meta_description, "A daily habit guide");

        let bundle = Extractor::default().extract("https://example.com/article/a", "<html></html>");
        assert_eq!(bundle.article.meta_description, "");
    }

    #[test]
    fn headline_derives_from_title_and_scores_the_body() {
        let html = r#"<html><body>
            <h1>Boost Energy</h1>
            <article>this proven routine will transform your mornings</article>
        </body></html>"#;
        let bundle = Extractor::default().extract("https://example.com/article/a", html);
        assert_eq!(bundle.headlines.len(), 1);
        let headline = &bundle.headlines[0];
        assert_eq!(headline.text, "Boost Energy");
        assert_eq!(headline.word_count, 2);
        assert!(headline.power_words.contains(&"proven".to_string()));
        assert!(headline.power_words.contains(&"transform".to_string()));
        assert!(headline.emotional_score >= -1.0 && headline.emotional_score <= 1.0);
    }

    #[test]
    fn site_hint_selectors_override_defaults() {
        let html = r#"<html><body>
            <article>generic container</article>
            <div id="story">hinted container</div>
        </body></html>"#;
        let extractor = Extractor::new(&["#story".to_string()]);
        let bundle = extractor.extract("https://example.com/article/a", html);
        assert_eq!(bundle.article.content, "hinted container");

        // Invalid hints fall back to the defaults rather than extracting nothing.
        let extractor = Extractor::new(&["[[broken".to_string()]);
        let bundle = extractor.extract("https://example.com/article/a", html);
        assert_eq!(bundle.article.content, "generic container");
    }
}
