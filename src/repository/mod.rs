//! SQLite persistence for articles, their derived rows, and insight
//! snapshots.
//!
//! Each repository owns the path to the shared database file and opens a
//! fresh connection per operation. Writes are transactional; the aggregation
//! read path takes all of its inputs inside one transaction so a snapshot
//! never observes a half-written article.

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

mod article;
mod helpers;
mod insight;

pub use article::ArticleRepository;
pub use insight::InsightRepository;

/// Storage-layer failure. An empty query result is not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Open a connection with the pragmas every repository relies on.
pub(crate) fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// The repositories sharing one database file, opened together.
#[derive(Debug, Clone)]
pub struct ContentStore {
    pub articles: ArticleRepository,
    pub insights: InsightRepository,
}

impl ContentStore {
    /// Open the store, creating the database and schema on first use.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            articles: ArticleRepository::new(path)?,
            insights: InsightRepository::new(path)?,
        })
    }
}
