//! Data models for docreview.

mod analysis;
mod document;

pub use analysis::{AnalysisResult, ReadabilityLabel, Severity, Suggestion, SuggestionType};
pub use document::{compute_hash, DocumentRecord, DocumentStatus, NewDocument, SourceFile};
