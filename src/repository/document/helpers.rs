//! Row mapping for the document store.

use rusqlite::Row;

use crate::models::{
    DocumentRecord, DocumentStatus, ReadabilityLabel, Severity, Suggestion, SuggestionType,
};
use crate::repository::parse_datetime;

pub(crate) const DOCUMENT_COLUMNS: &str = "id, name, mime_type, size_bytes, content_hash, content, \
     status, score, grammar_issues, formatting_issues, style_issues, readability, degraded, \
     error, created_at, updated_at";

/// Parse a document row.
pub(crate) fn row_to_document(row: &Row) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        mime_type: row.get("mime_type")?,
        size_bytes: row.get::<_, i64>("size_bytes")?.max(0) as u64,
        content_hash: row.get("content_hash")?,
        content: row.get("content")?,
        status: DocumentStatus::from_str(&row.get::<_, String>("status")?)
            .unwrap_or(DocumentStatus::Failed),
        score: row
            .get::<_, Option<i64>>("score")?
            .map(|s| s.clamp(0, 100) as u8),
        grammar_issues: row.get::<_, Option<i64>>("grammar_issues")?.map(to_count),
        formatting_issues: row
            .get::<_, Option<i64>>("formatting_issues")?
            .map(to_count),
        style_issues: row.get::<_, Option<i64>>("style_issues")?.map(to_count),
        readability: row
            .get::<_, Option<String>>("readability")?
            .and_then(|s| ReadabilityLabel::parse(&s)),
        degraded: row.get("degraded")?,
        error: row.get("error")?,
        created_at: parse_datetime(&row.get::<_, String>("created_at")?),
        updated_at: parse_datetime(&row.get::<_, String>("updated_at")?),
    })
}

/// Parse a suggestion row. Unknown enum values fall back to the mildest reading.
pub(crate) fn row_to_suggestion(row: &Row) -> rusqlite::Result<Suggestion> {
    Ok(Suggestion {
        kind: SuggestionType::parse(&row.get::<_, String>("type")?)
            .unwrap_or(SuggestionType::Style),
        severity: Severity::parse(&row.get::<_, String>("severity")?).unwrap_or(Severity::Low),
        issue: row.get("issue")?,
        suggestion: row.get("suggestion")?,
        explanation: row.get("explanation")?,
    })
}

fn to_count(n: i64) -> u32 {
    n.clamp(0, u32::MAX as i64) as u32
}
