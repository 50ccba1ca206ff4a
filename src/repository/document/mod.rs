//! SQLite document store.
//!
//! - `schema`: table creation
//! - `crud`: document rows
//! - `suggestions`: batched suggestion writes and reads
//! - `helpers`: row mapping

mod crud;
mod helpers;
mod schema;
mod suggestions;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::Connection;

use super::{DocumentStore, Result, StoreError};
use crate::models::{AnalysisResult, DocumentRecord, DocumentStatus, NewDocument, Suggestion};

/// SQLite-backed document store.
///
/// Holds only the database path; each operation opens its own connection
/// on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    db_path: PathBuf,
}

impl SqliteDocumentStore {
    /// Open (creating if needed) the database at `db_path`.
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub(crate) fn connect(&self) -> Result<Connection> {
        super::connect(&self.db_path)
    }

    /// Get the database path.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteDocumentStore) -> Result<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create_document(&self, doc: NewDocument) -> Result<String> {
        self.blocking(move |s| s.insert_document(&doc)).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: DocumentStatus,
        error: Option<&str>,
    ) -> Result<()> {
        let id = id.to_string();
        let error = error.map(str::to_string);
        self.blocking(move |s| s.set_status(&id, status, error.as_deref()))
            .await
    }

    async fn save_analysis(
        &self,
        id: &str,
        result: &AnalysisResult,
        degraded: bool,
    ) -> Result<()> {
        let id = id.to_string();
        let result = result.clone();
        self.blocking(move |s| s.write_analysis(&id, &result, degraded))
            .await
    }

    async fn insert_suggestions(&self, id: &str, suggestions: &[Suggestion]) -> Result<usize> {
        let id = id.to_string();
        let suggestions = suggestions.to_vec();
        self.blocking(move |s| s.write_suggestions(&id, &suggestions))
            .await
    }

    async fn get_document(&self, id: &str) -> Result<Option<DocumentRecord>> {
        let id = id.to_string();
        self.blocking(move |s| s.get(&id)).await
    }

    async fn list_documents(&self, limit: usize) -> Result<Vec<DocumentRecord>> {
        self.blocking(move |s| s.list(limit)).await
    }

    async fn get_suggestions(&self, id: &str) -> Result<Vec<Suggestion>> {
        let id = id.to_string();
        self.blocking(move |s| s.read_suggestions(&id)).await
    }
}
