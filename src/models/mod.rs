//! Data models for contentintel.

mod article;
mod insight;

pub use article::{Article, ArticleBundle, ContentSignal, Heading, Headline, Keyword, SignalKind};
pub use insight::{AverageMetrics, InsightSnapshot, KeywordCount};
