//! Degraded results substituted when real analysis cannot be performed.

use crate::models::{AnalysisResult, ReadabilityLabel, Severity, Suggestion, SuggestionType};

/// Score reported when the document text could not be extracted.
pub const EXTRACTION_DEFAULT_SCORE: u8 = 50;

/// Score reported when the analysis service failed or replied with garbage.
pub const SERVICE_DEFAULT_SCORE: u8 = 70;

/// Result for documents whose text extraction produced only a notice.
pub fn extraction_default() -> AnalysisResult {
    degraded(
        EXTRACTION_DEFAULT_SCORE,
        Suggestion::new(
            SuggestionType::Formatting,
            Severity::Medium,
            "Text extraction issue detected",
            "Extract the text from your document manually and try again",
            "Your document appears to be image-based, protected, or in a format \
             whose text could not be extracted for analysis",
        ),
    )
}

/// Result for analysis requests that failed in transport or parsing.
pub fn service_default() -> AnalysisResult {
    degraded(
        SERVICE_DEFAULT_SCORE,
        Suggestion::new(
            SuggestionType::Grammar,
            Severity::Medium,
            "Failed to perform document analysis",
            "Please try again later",
            "The AI service is currently unavailable. \
             Please check your API key and try again.",
        ),
    )
}

fn degraded(score: u8, suggestion: Suggestion) -> AnalysisResult {
    AnalysisResult {
        grammar_issues: 0,
        formatting_issues: 0,
        style_issues: 0,
        score,
        readability: ReadabilityLabel::Fair,
        suggestions: vec![suggestion],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_well_formed() {
        for (result, score, kind) in [
            (extraction_default(), 50, SuggestionType::Formatting),
            (service_default(), 70, SuggestionType::Grammar),
        ] {
            assert_eq!(result.total_issues(), 0);
            assert_eq!(result.score, score);
            assert_eq!(result.readability, ReadabilityLabel::Fair);
            assert_eq!(result.suggestions.len(), 1);
            assert_eq!(result.suggestions[0].kind, kind);
            assert_eq!(result.suggestions[0].severity, Severity::Medium);
        }
    }
}
