//! MIME type categorization for uploaded documents.

use std::path::Path;

/// MIME types read directly as text.
const PLAIN_TEXT_TYPES: &[&str] = &[
    "text/plain",
    "text/markdown",
    "text/html",
    "application/json",
];

/// Word formats with no in-process parser.
const LEGACY_DOCUMENT_TYPES: &[&str] = &[
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Extraction strategy bucket for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    PlainText,
    Pdf,
    LegacyDocument,
    Unknown,
}

impl FileCategory {
    pub fn id(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Pdf => "pdf",
            Self::LegacyDocument => "legacy_document",
            Self::Unknown => "unknown",
        }
    }

    /// Short tag for listings.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::PlainText => "[txt]",
            Self::Pdf => "[pdf]",
            Self::LegacyDocument => "[doc]",
            Self::Unknown => "[---]",
        }
    }
}

/// Strip parameters and normalize case: `Text/Plain; charset=utf-8` -> `text/plain`.
fn essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Categorize a MIME type alone.
pub fn mime_type_category(mime: &str) -> FileCategory {
    let mime = essence(mime);

    if PLAIN_TEXT_TYPES.contains(&mime.as_str()) {
        FileCategory::PlainText
    } else if mime == "application/pdf" {
        FileCategory::Pdf
    } else if LEGACY_DOCUMENT_TYPES.contains(&mime.as_str()) {
        FileCategory::LegacyDocument
    } else {
        FileCategory::Unknown
    }
}

/// Guess a MIME type from a file name's extension.
pub fn guess_from_name(file_name: &str) -> Option<String> {
    mime_guess::from_path(Path::new(file_name))
        .first()
        .map(|m| m.essence_str().to_string())
}

/// Classify an uploaded file.
///
/// The declared MIME type wins; when it is absent or blank the type is
/// guessed from the file name's extension.
pub fn classify(mime_type: Option<&str>, file_name: &str) -> FileCategory {
    match mime_type.map(str::trim).filter(|m| !m.is_empty()) {
        Some(mime) => mime_type_category(mime),
        None => guess_from_name(file_name)
            .map(|m| mime_type_category(&m))
            .unwrap_or(FileCategory::Unknown),
    }
}

/// Detect a MIME type from content magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|kind| kind.mime_type().to_string())
}

/// Map MIME type to a display label for listings.
pub fn mime_label(mime: Option<&str>) -> &'static str {
    match mime.map(essence).as_deref() {
        Some("application/pdf") => "PDF",
        Some("text/plain") => "TXT",
        Some("text/markdown") => "MD",
        Some("text/html") => "HTML",
        Some("application/json") => "JSON",
        Some("application/msword") => "DOC",
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
            "DOCX"
        }
        _ => "FILE",
    }
}
