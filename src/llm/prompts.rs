//! Prompt construction for document analysis.

use thiserror::Error;

use crate::extraction::ExtractionResult;
use crate::utils::truncate_utf8;

/// Default cap on document bytes sent to the model.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 48_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("extraction produced a fallback notice, not document text")]
    FallbackNotice,
}

/// Text and line count handed to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub document_text: String,
    pub line_count: usize,
}

impl AnalysisRequest {
    /// Derive the request from extracted text: trim, cap, count lines.
    pub fn from_extraction(
        extraction: &ExtractionResult,
        max_content_chars: usize,
    ) -> Result<Self, PromptError> {
        if extraction.is_fallback_notice {
            return Err(PromptError::FallbackNotice);
        }

        let trimmed = extraction.text.trim();
        let document_text = truncate_utf8(trimmed, max_content_chars)
            .trim_end()
            .to_string();
        let line_count = document_text.split('\n').count();

        Ok(Self {
            document_text,
            line_count,
        })
    }

    /// Render the full analysis prompt.
    pub fn render(&self) -> String {
        format!(
            r#"You are a professional document analyzer. Analyze the text below and return ONLY a valid JSON object.

Document Information:
- Total lines: {line_count}

Analyze this text for:
1. Grammar issues (spelling, punctuation, grammar)
2. Formatting issues (capitalization, spacing, indentation)
3. Style issues (word choice, sentence structure)

Return your analysis as a JSON object with these exact fields:
{{
  "grammar_issues": integer,
  "formatting_issues": integer,
  "style_issues": integer,
  "score": integer (0-100 quality score),
  "readability_score": string (exactly one of: Poor, Fair, Good, Very Good, Excellent),
  "suggestions": [
    {{
      "type": string (grammar, formatting, or style),
      "severity": string (low, medium, or high),
      "issue": string (brief description),
      "line": integer (line number),
      "original_text": string (the problematic text),
      "suggestion": string (corrected text),
      "explanation": string (why this needs correction)
    }}
  ]
}}

CRITICAL: Return ONLY the JSON, with no prose before or after it.
Do not wrap the JSON in code fences or markdown.

Text to analyze:
{text}"#,
            line_count = self.line_count,
            text = self.document_text,
        )
    }
}

/// Builds analysis prompts with a configured content cap.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_content_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl PromptBuilder {
    pub fn new(max_content_chars: usize) -> Self {
        Self { max_content_chars }
    }

    pub fn request(&self, extraction: &ExtractionResult) -> Result<AnalysisRequest, PromptError> {
        AnalysisRequest::from_extraction(extraction, self.max_content_chars)
    }

    pub fn build(&self, extraction: &ExtractionResult) -> Result<String, PromptError> {
        Ok(self.request(extraction)?.render())
    }
}

/// Build a prompt with the default content cap.
pub fn build_prompt(extraction: &ExtractionResult) -> Result<String, PromptError> {
    PromptBuilder::default().build(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(text: &str) -> ExtractionResult {
        ExtractionResult {
            text: text.to_string(),
            is_fallback_notice: false,
            page_count: None,
        }
    }

    #[test]
    fn test_single_line_prompt() {
        let prompt = build_prompt(&extracted("This is a test sentence.")).unwrap();
        assert!(prompt.contains("Total lines: 1"));
        assert!(prompt.ends_with("This is a test sentence."));
        assert!(prompt.contains("Very Good"));
        assert!(prompt.contains("original_text"));
    }

    #[test]
    fn test_line_count_uses_trimmed_text() {
        let request = PromptBuilder::default()
            .request(&extracted("\n\n first\nsecond\n\nfourth \n\n"))
            .unwrap();
        assert_eq!(request.document_text, "first\nsecond\n\nfourth");
        assert_eq!(request.line_count, 4);
    }

    #[test]
    fn test_deterministic() {
        let e = extracted("Same text.\nTwice.");
        assert_eq!(build_prompt(&e).unwrap(), build_prompt(&e).unwrap());
    }

    #[test]
    fn test_fallback_notice_rejected() {
        let notice = ExtractionResult {
            text: "notice".to_string(),
            is_fallback_notice: true,
            page_count: None,
        };
        assert_eq!(build_prompt(&notice), Err(PromptError::FallbackNotice));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = "é".repeat(20);
        let request = PromptBuilder::new(7).request(&extracted(&text)).unwrap();
        assert_eq!(request.document_text, "ééé");
        assert_eq!(request.line_count, 1);
    }
}
