//! Candidate URL discovery and admission.
//!
//! Discovery is a pure function over page markup; admission is per-pass
//! state owned by one site's crawl. A URL is admitted at most once per pass
//! and only while it stays on the seed's domain, matches the article policy,
//! and fits under the page cap.

use std::collections::HashSet;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

/// Default path patterns marking a URL as a probable article. Evaluated in
/// order; recall-favoring, so false positives are expected.
const ARTICLE_PATTERNS: [&str; 8] = [
    r"/article/",
    r"/blog/",
    r"/post/",
    r"/\d{4}/\d{2}/",
    r"/health/",
    r"/fitness/",
    r"/nutrition/",
    r"/wellness/",
];

/// Ordered article-URL matchers, replaceable per site.
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    patterns: Vec<Regex>,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self::from_patterns(&ARTICLE_PATTERNS)
    }
}

impl UrlPolicy {
    /// Build a policy from pattern strings, e.g. a site's hints. Invalid
    /// patterns are skipped; when none survive, the defaults apply.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut compiled = Vec::new();
        for raw in patterns {
            match Regex::new(raw.as_ref()) {
                Ok(regex) => compiled.push(regex),
                Err(_) => {
                    warn!(pattern = raw.as_ref(), "skipping invalid article pattern");
                }
            }
        }
        if compiled.is_empty() {
            for raw in ARTICLE_PATTERNS {
                if let Ok(regex) = Regex::new(raw) {
                    compiled.push(regex);
                }
            }
        }
        Self { patterns: compiled }
    }

    /// True when the URL looks like an article page.
    pub fn is_article_url(&self, url: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(url))
    }
}

/// Resolve every hyperlink on a page to an absolute URL, deduplicated in
/// document order. Pure; malformed input yields an empty set.
pub fn discover_links(markup: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(markup);
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(href) => href.trim(),
            None => continue,
        };
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
        {
            continue;
        }
        let mut resolved = match base.join(href) {
            Ok(url) => url,
            Err(_) => continue,
        };
        // Fragment variants would upsert as distinct articles.
        resolved.set_fragment(None);
        let resolved = resolved.to_string();
        if seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }
    links
}

/// Per-pass admission state for one site's crawl.
#[derive(Debug)]
pub struct Frontier {
    policy: UrlPolicy,
    allowed_domain: Option<String>,
    max_pages: usize,
    visited: HashSet<String>,
    admitted: usize,
}

impl Frontier {
    /// Fresh state for one pass over one seed site.
    pub fn new(policy: UrlPolicy, seed_url: &str, max_pages: usize) -> Self {
        Self {
            policy,
            allowed_domain: registrable_domain(seed_url),
            max_pages,
            visited: HashSet::new(),
            admitted: 0,
        }
    }

    /// Admit a candidate URL: on the seed's domain, matching the article
    /// policy, not yet seen this pass, and under the page cap.
    pub fn admit(&mut self, url: &str) -> bool {
        if self.admitted >= self.max_pages {
            return false;
        }
        if let Some(domain) = &self.allowed_domain {
            match host_of(url) {
                Some(host) if on_domain(&host, domain) => {}
                _ => return false,
            }
        }
        if !self.policy.is_article_url(url) {
            return false;
        }
        if !self.visited.insert(url.to_string()) {
            return false;
        }
        self.admitted += 1;
        true
    }

    /// URLs admitted so far this pass.
    pub fn admitted(&self) -> usize {
        self.admitted
    }
}

/// The host itself or any subdomain of it. Suffix matching alone would let
/// a lookalike host through ("badexample.com" for "example.com").
fn on_domain(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Last two host labels, the scope one site's crawl may wander within.
fn registrable_domain(url: &str) -> Option<String> {
    let host = host_of(url)?;
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 2 {
        Some(labels[labels.len() - 2..].join("."))
    } else {
        Some(host)
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_article_paths_and_rejects_others() {
        let html = r#"<html><body>
            <a href="/article/a">A</a>
            <a href="/other/b">B</a>
            <a href="/2024/03/c">C</a>
        </body></html>"#;
        let links = discover_links(html, "https://news.example.com");
        let mut frontier = Frontier::new(UrlPolicy::default(), "https://news.example.com", 100);
        let admitted: Vec<String> = links.into_iter().filter(|l| frontier.admit(l)).collect();
        assert_eq!(
            admitted,
            vec![
                "https://news.example.com/article/a".to_string(),
                "https://news.example.com/2024/03/c".to_string(),
            ]
        );
    }

    #[test]
    fn is_article_url_is_pure() {
        let policy = UrlPolicy::default();
        let url = "https://example.com/blog/habits";
        assert!(policy.is_article_url(url));
        assert_eq!(policy.is_article_url(url), policy.is_article_url(url));
        assert!(!policy.is_article_url("https://example.com/pricing"));
    }

    #[test]
    fn site_patterns_replace_the_defaults() {
        let policy = UrlPolicy::from_patterns(&["/stories/".to_string()]);
        assert!(policy.is_article_url("https://example.com/stories/one"));
        assert!(!policy.is_article_url("https://example.com/article/one"));

        // Nothing valid supplied: fall back to the defaults.
        let policy = UrlPolicy::from_patterns(&["(unclosed".to_string()]);
        assert!(policy.is_article_url("https://example.com/article/one"));
    }

    #[test]
    fn discovery_skips_inert_and_unresolvable_hrefs() {
        let html = r##"<html><body>
            <a href="">empty</a>
            <a href="#top">fragment</a>
            <a href="javascript:void(0)">js</a>
            <a href="mailto:hi@example.com">mail</a>
            <a href="tel:+15551234">tel</a>
            <a href="/article/kept">kept</a>
            <a href="/article/kept#section">kept again</a>
        </body></html>"##;
        let links = discover_links(html, "https://example.com");
        assert_eq!(links, vec!["https://example.com/article/kept".to_string()]);

        assert!(discover_links(html, "not a base url").is_empty());
    }

    #[test]
    fn admission_dedups_within_a_pass() {
        let mut frontier = Frontier::new(UrlPolicy::default(), "https://example.com", 100);
        assert!(frontier.admit("https://example.com/article/a"));
        assert!(!frontier.admit("https://example.com/article/a"));
        assert_eq!(frontier.admitted(), 1);
    }

    #[test]
    fn admission_stays_on_the_seed_domain() {
        let mut frontier = Frontier::new(UrlPolicy::default(), "https://www.example.com", 100);
        assert!(frontier.admit("https://blog.example.com/article/a"));
        assert!(!frontier.admit("https://elsewhere.net/article/b"));
        assert!(!frontier.admit("https://badexample.com/article/c"));
    }

    #[test]
    fn admission_respects_the_page_cap() {
        let mut frontier = Frontier::new(UrlPolicy::default(), "https://example.com", 2);
        assert!(frontier.admit("https://example.com/article/a"));
        assert!(frontier.admit("https://example.com/article/b"));
        assert!(!frontier.admit("https://example.com/article/c"));
        assert_eq!(frontier.admitted(), 2);
    }
}
