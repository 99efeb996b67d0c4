//! Article persistence keyed by URL.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::Result;

mod query;
mod schema;
mod stats;
mod upsert;

/// Articles with their owned headline/keyword/signal rows.
///
/// Upserts replace the whole record for a URL, derived rows included, in one
/// transaction. The article id is stable across re-scrapes.
#[derive(Debug, Clone)]
pub struct ArticleRepository {
    db_path: PathBuf,
}

impl ArticleRepository {
    /// Open the repository, creating the schema if needed.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let repo = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    pub(crate) fn connect(&self) -> Result<Connection> {
        super::connect(&self.db_path)
    }
}
