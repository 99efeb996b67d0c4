//! Articles and the records derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One heading element with its level, kept in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    /// Trimmed text content
    pub text: String,
}

/// An article scraped from one URL.
///
/// The URL is the identity: re-scraping the same URL overwrites the record
/// in place and advances `scraped_at`. The pipeline never deletes articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Database ID (0 if not yet saved)
    pub id: i64,
    /// Canonical page URL, unique across the store
    pub url: String,
    /// First h1 on the page, falling back to the title tag
    pub title: String,
    /// Extracted body text
    pub content: String,
    /// Meta description, empty when the page has none
    pub meta_description: String,
    /// Whitespace-delimited token count of the body
    pub word_count: u32,
    /// Every h1 through h6 in document order
    pub headings: Vec<Heading>,
    /// Top keywords by in-article frequency, highest first
    pub keywords: Vec<String>,
    /// Links resolving to the page's own host
    pub internal_links: u32,
    /// Links resolving to any other host
    pub external_links: u32,
    /// Number of img elements
    pub image_count: u32,
    /// Host the article was scraped from
    pub source_domain: String,
    /// When the article was last scraped
    pub scraped_at: DateTime<Utc>,
}

/// A scored headline derived from an article.
///
/// Replaced wholesale whenever the owning article is re-scraped; a headline
/// row must never outlive its article generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    /// Database ID (0 if not yet saved)
    pub id: i64,
    /// Owning article ID (0 until the bundle is stored)
    pub article_id: i64,
    /// Headline text
    pub text: String,
    /// Whitespace-delimited token count of the headline itself
    pub word_count: u32,
    /// Power words detected in the owning article's body
    pub power_words: Vec<String>,
    /// Emotional polarity of the owning article's body, in [-1, 1]
    pub emotional_score: f64,
}

/// A keyword with its frequency within one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub frequency: u32,
}

/// Kind of secondary signal detected in a page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Call-to-action phrase
    Cta,
    /// Social-proof phrase
    SocialProof,
    /// Persuasion power word
    PowerWord,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Cta => "cta",
            SignalKind::SocialProof => "social_proof",
            SignalKind::PowerWord => "power_word",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cta" => Some(SignalKind::Cta),
            "social_proof" => Some(SignalKind::SocialProof),
            "power_word" => Some(SignalKind::PowerWord),
            _ => None,
        }
    }
}

/// One detected signal occurrence, stored as a tagged child row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSignal {
    pub kind: SignalKind,
    /// The matched text
    pub text: String,
}

/// Everything the extractor derives from one fetched page. Stored as a unit
/// in a single transaction.
#[derive(Debug, Clone)]
pub struct ArticleBundle {
    pub article: Article,
    pub headlines: Vec<Headline>,
    pub keywords: Vec<Keyword>,
    pub signals: Vec<ContentSignal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_kind_round_trips() {
        for kind in [SignalKind::Cta, SignalKind::SocialProof, SignalKind::PowerWord] {
            assert_eq!(SignalKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(SignalKind::from_str("unknown"), None);
    }

    #[test]
    fn heading_serializes_compactly() {
        let heading = Heading {
            level: 2,
            text: "Benefits".to_string(),
        };
        let json = serde_json::to_string(&heading).unwrap();
        assert_eq!(json, r#"{"level":2,"text":"Benefits"}"#);
    }
}
