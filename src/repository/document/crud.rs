//! Basic create, read and update operations for documents.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::helpers::{row_to_document, DOCUMENT_COLUMNS};
use super::SqliteDocumentStore;
use crate::models::{AnalysisResult, DocumentRecord, DocumentStatus, NewDocument};
use crate::repository::{Result, StoreError};

impl SqliteDocumentStore {
    /// Insert a new document in `Analyzing` status.
    pub fn insert_document(&self, doc: &NewDocument) -> Result<String> {
        let conn = self.connect()?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"INSERT INTO documents
               (id, name, mime_type, size_bytes, content_hash, content, status,
                degraded, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)"#,
            params![
                id,
                doc.name,
                doc.mime_type,
                doc.size_bytes as i64,
                doc.content_hash,
                doc.content,
                DocumentStatus::Analyzing.as_str(),
                now,
            ],
        )?;

        debug!("Created document {} ({})", id, doc.name);
        Ok(id)
    }

    /// Update a document's status and error message.
    pub fn set_status(&self, id: &str, status: DocumentStatus, error: Option<&str>) -> Result<()> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE documents SET status = ?1, error = ?2, updated_at = ?3 WHERE id = ?4",
            params![status.as_str(), error, Utc::now().to_rfc3339(), id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Store an analysis summary and mark the document analyzed.
    pub fn write_analysis(&self, id: &str, result: &AnalysisResult, degraded: bool) -> Result<()> {
        let conn = self.connect()?;
        let updated = conn.execute(
            r#"UPDATE documents SET
                status = ?1, score = ?2, grammar_issues = ?3, formatting_issues = ?4,
                style_issues = ?5, readability = ?6, degraded = ?7, error = NULL,
                updated_at = ?8
               WHERE id = ?9"#,
            params![
                DocumentStatus::Analyzed.as_str(),
                result.score,
                result.grammar_issues,
                result.formatting_issues,
                result.style_issues,
                result.readability.as_str(),
                degraded,
                Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Get a document by ID.
    pub fn get(&self, id: &str) -> Result<Option<DocumentRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM documents WHERE id = ?",
            DOCUMENT_COLUMNS
        ))?;
        let doc = stmt.query_row(params![id], row_to_document).optional()?;
        Ok(doc)
    }

    /// List documents, newest first.
    pub fn list(&self, limit: usize) -> Result<Vec<DocumentRecord>> {
        let conn = self.connect()?;
        let limit = if limit == 0 { -1 } else { limit as i64 };
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM documents ORDER BY created_at DESC, rowid DESC LIMIT ?",
            DOCUMENT_COLUMNS
        ))?;
        let docs = stmt
            .query_map(params![limit], row_to_document)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(docs)
    }

    pub(crate) fn exists(&self, conn: &rusqlite::Connection, id: &str) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM documents WHERE id = ?", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }
}
