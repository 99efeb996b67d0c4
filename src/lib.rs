//! Content intelligence acquisition and insight system.
//!
//! Crawls configured publishers for article pages, extracts text, headings,
//! links, and marketing signals from each, stores everything in SQLite, and
//! aggregates the corpus into append-only insight snapshots.

pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod models;
pub mod repository;
pub mod services;
