//! Document models: uploaded source files and stored review records.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::analysis::ReadabilityLabel;

/// An uploaded file handed to the pipeline.
///
/// Immutable once built; its lifetime ends when extraction completes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name, used in notices and for extension-based type guessing.
    pub name: String,
    /// Declared MIME type, if the uploader supplied one.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// File content.
    pub raw_bytes: Vec<u8>,
}

impl SourceFile {
    /// Create a source file from in-memory content.
    pub fn new(name: impl Into<String>, mime_type: Option<String>, raw_bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.filter(|m| !m.trim().is_empty()),
            size_bytes: raw_bytes.len() as u64,
            raw_bytes,
        }
    }

    /// Read a file from disk. The file name is taken from the path.
    pub async fn from_path(path: &Path, mime_type: Option<String>) -> std::io::Result<Self> {
        let raw_bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_type, raw_bytes))
    }

    /// SHA-256 of the content, hex encoded.
    pub fn content_hash(&self) -> String {
        compute_hash(&self.raw_bytes)
    }
}

/// Compute SHA-256 hash of content.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Review status of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Analyzing,
    Analyzed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyzing => "analyzing",
            Self::Analyzed => "analyzed",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "analyzing" => Some(Self::Analyzing),
            "analyzed" => Some(Self::Analyzed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Values needed to create a document row.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub name: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub content_hash: String,
    /// Extracted text, or the fallback notice shown in its place.
    pub content: String,
}

impl NewDocument {
    /// Build from a source file and the text extracted from it.
    pub fn from_source(file: &SourceFile, content: String) -> Self {
        Self {
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size_bytes: file.size_bytes,
            content_hash: file.content_hash(),
            content,
        }
    }
}

/// A stored document with its latest review summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub content_hash: String,
    pub content: String,
    pub status: DocumentStatus,
    pub score: Option<u8>,
    pub grammar_issues: Option<u32>,
    pub formatting_issues: Option<u32>,
    pub style_issues: Option<u32>,
    pub readability: Option<ReadabilityLabel>,
    /// Whether the stored analysis is a degraded default.
    pub degraded: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Sum of stored issue counts (zero when not yet analyzed).
    pub fn total_issues(&self) -> u32 {
        self.grammar_issues
            .unwrap_or(0)
            .saturating_add(self.formatting_issues.unwrap_or(0))
            .saturating_add(self.style_issues.unwrap_or(0))
    }
}
