//! Database schema initialization.

use super::SqliteDocumentStore;
use crate::repository::Result;

impl SqliteDocumentStore {
    /// Initialize the database schema.
    pub(crate) fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                mime_type TEXT,
                size_bytes INTEGER NOT NULL,
                content_hash TEXT NOT NULL,
                content TEXT NOT NULL,
                status TEXT NOT NULL,
                score INTEGER,
                grammar_issues INTEGER,
                formatting_issues INTEGER,
                style_issues INTEGER,
                readability TEXT,
                degraded INTEGER NOT NULL DEFAULT 0,
                error TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS document_suggestions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                type TEXT NOT NULL,
                severity TEXT NOT NULL,
                issue TEXT NOT NULL,
                suggestion TEXT NOT NULL,
                explanation TEXT NOT NULL,
                FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at);
            CREATE INDEX IF NOT EXISTS idx_documents_content_hash ON documents(content_hash);
            CREATE INDEX IF NOT EXISTS idx_suggestions_document
                ON document_suggestions(document_id, position);
            "#,
        )?;
        Ok(())
    }
}
