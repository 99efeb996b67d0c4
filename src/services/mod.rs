//! Service layer for contentintel business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by the CLI or embedded through the library.

pub mod crawl;
pub mod insight;

pub use crawl::{CrawlEvent, CrawlOptions, CrawlOutcome, CrawlService};
pub use insight::{AggregationError, InsightService};
