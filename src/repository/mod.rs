//! Repository layer for persisting reviewed documents.
//!
//! [`DocumentStore`] is the persistence seam used by the review service.
//! [`SqliteDocumentStore`] is the durable backend; [`InMemoryDocumentStore`]
//! backs tests and dry runs.

mod document;
mod memory;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use thiserror::Error;

use crate::models::{AnalysisResult, DocumentRecord, DocumentStatus, NewDocument, Suggestion};

pub use document::SqliteDocumentStore;
pub use memory::InMemoryDocumentStore;

/// Suggestions are written in chunks of at most this many rows, one
/// transaction per chunk.
pub const SUGGESTION_BATCH_SIZE: usize = 10;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Storage task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence operations for documents and their review results.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document row in `Analyzing` status and return its ID.
    async fn create_document(&self, doc: NewDocument) -> Result<String>;

    /// Set a document's status, with an optional error message.
    async fn update_status(&self, id: &str, status: DocumentStatus, error: Option<&str>)
        -> Result<()>;

    /// Store the analysis summary and mark the document `Analyzed`.
    async fn save_analysis(&self, id: &str, result: &AnalysisResult, degraded: bool)
        -> Result<()>;

    /// Append suggestions in [`SUGGESTION_BATCH_SIZE`] chunks. Returns rows written.
    async fn insert_suggestions(&self, id: &str, suggestions: &[Suggestion]) -> Result<usize>;

    async fn get_document(&self, id: &str) -> Result<Option<DocumentRecord>>;

    /// Most recent documents first. A limit of 0 returns everything.
    async fn list_documents(&self, limit: usize) -> Result<Vec<DocumentRecord>>;

    /// Suggestions for a document, in insertion order.
    async fn get_suggestions(&self, id: &str) -> Result<Vec<Suggestion>>;
}

/// Open a SQLite connection with the pragmas every store connection uses.
pub(crate) fn connect(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
