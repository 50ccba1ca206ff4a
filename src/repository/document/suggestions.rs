//! Suggestion rows, written in bounded batches.

use rusqlite::params;
use tracing::debug;

use super::helpers::row_to_suggestion;
use super::SqliteDocumentStore;
use crate::models::Suggestion;
use crate::repository::{Result, StoreError, SUGGESTION_BATCH_SIZE};

impl SqliteDocumentStore {
    /// Append suggestions after any already stored for the document.
    ///
    /// Each chunk of [`SUGGESTION_BATCH_SIZE`] rows commits in its own
    /// transaction, so a failure leaves earlier chunks in place.
    pub fn write_suggestions(&self, document_id: &str, suggestions: &[Suggestion]) -> Result<usize> {
        let mut conn = self.connect()?;
        if !self.exists(&conn, document_id)? {
            return Err(StoreError::NotFound(document_id.to_string()));
        }

        let mut position: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM document_suggestions WHERE document_id = ?",
            params![document_id],
            |row| row.get(0),
        )?;

        let mut written = 0;
        for (batch, chunk) in suggestions.chunks(SUGGESTION_BATCH_SIZE).enumerate() {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    r#"INSERT INTO document_suggestions
                       (document_id, position, type, severity, issue, suggestion, explanation)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                )?;
                for s in chunk {
                    stmt.execute(params![
                        document_id,
                        position,
                        s.kind.as_str(),
                        s.severity.as_str(),
                        s.issue,
                        s.suggestion,
                        s.explanation,
                    ])?;
                    position += 1;
                }
            }
            tx.commit()?;
            written += chunk.len();
            debug!(
                "Stored suggestion batch {} ({} rows) for {}",
                batch + 1,
                chunk.len(),
                document_id
            );
        }

        Ok(written)
    }

    /// Suggestions for a document in insertion order.
    pub fn read_suggestions(&self, document_id: &str) -> Result<Vec<Suggestion>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"SELECT type, severity, issue, suggestion, explanation
               FROM document_suggestions WHERE document_id = ? ORDER BY position"#,
        )?;
        let rows = stmt
            .query_map(params![document_id], row_to_suggestion)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
