//! Pipeline outcome and progress event types.

use serde::{Deserialize, Serialize};

use crate::extraction::ExtractionResult;
use crate::models::AnalysisResult;
use crate::utils::FileCategory;

/// Which degraded default replaced a real analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    /// Extraction produced a fallback notice instead of document text.
    ExtractionLimited,
    /// The analysis service failed, timed out, was cancelled, or replied unparseably.
    ServiceUnavailable,
}

impl DegradedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractionLimited => "extraction_limited",
            Self::ServiceUnavailable => "service_unavailable",
        }
    }
}

/// Full outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub extraction: ExtractionResult,
    pub degraded: Option<DegradedReason>,
}

/// Events emitted while a document moves through the pipeline.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// File type determined
    Classified {
        file_name: String,
        category: FileCategory,
    },
    /// Text extraction finished
    Extracted {
        chars: usize,
        is_fallback_notice: bool,
        page_count: Option<usize>,
    },
    /// Prompt sent to the analysis service
    RequestSent { line_count: usize },
    /// Raw reply received from the analysis service
    ResponseReceived { chars: usize },
    /// Pipeline finished
    Completed { degraded: Option<DegradedReason> },
}
