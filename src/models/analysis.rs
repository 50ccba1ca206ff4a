//! Analysis result models.
//!
//! Field names follow the JSON contract the language model is asked to emit,
//! so a serialized [`AnalysisResult`] parses back into an equal value.

use serde::{Deserialize, Serialize};

/// Category of a review suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Grammar,
    Formatting,
    Style,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Formatting => "formatting",
            Self::Style => "style",
        }
    }

    /// Parse a type name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "grammar" => Some(Self::Grammar),
            "formatting" => Some(Self::Formatting),
            "style" => Some(Self::Style),
            _ => None,
        }
    }
}

/// How serious a suggestion is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a severity name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Five-point ordinal readability scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReadabilityLabel {
    Poor,
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Excellent,
}

impl ReadabilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::VeryGood => "Very Good",
            Self::Excellent => "Excellent",
        }
    }

    /// Parse a label leniently ("very good", "Very_Good", "VERYGOOD").
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "poor" => Some(Self::Poor),
            "fair" => Some(Self::Fair),
            "good" => Some(Self::Good),
            "verygood" => Some(Self::VeryGood),
            "excellent" => Some(Self::Excellent),
            _ => None,
        }
    }

    /// Derive a label from a 0-100 quality score.
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            80..=89 => Self::VeryGood,
            70..=79 => Self::Good,
            60..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl std::fmt::Display for ReadabilityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single review suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub severity: Severity,
    /// Short description, prefixed with `Line N:` when the model gave a line.
    pub issue: String,
    /// Corrected text or recommended action.
    pub suggestion: String,
    /// Why the change is needed, prefixed with the original text when known.
    pub explanation: String,
}

impl Suggestion {
    pub fn new(
        kind: SuggestionType,
        severity: Severity,
        issue: impl Into<String>,
        suggestion: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            issue: issue.into(),
            suggestion: suggestion.into(),
            explanation: explanation.into(),
        }
    }
}

/// Structured outcome of reviewing one document.
///
/// Always fully populated; degraded paths substitute a well-formed default
/// rather than leaving fields out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub grammar_issues: u32,
    pub formatting_issues: u32,
    pub style_issues: u32,
    /// Overall quality, 0-100.
    pub score: u8,
    #[serde(rename = "readability_score")]
    pub readability: ReadabilityLabel,
    pub suggestions: Vec<Suggestion>,
}

impl AnalysisResult {
    /// Sum of the three issue counts.
    pub fn total_issues(&self) -> u32 {
        self.grammar_issues
            .saturating_add(self.formatting_issues)
            .saturating_add(self.style_issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readability_from_score() {
        assert_eq!(ReadabilityLabel::from_score(100), ReadabilityLabel::Excellent);
        assert_eq!(ReadabilityLabel::from_score(90), ReadabilityLabel::Excellent);
        assert_eq!(ReadabilityLabel::from_score(85), ReadabilityLabel::VeryGood);
        assert_eq!(ReadabilityLabel::from_score(70), ReadabilityLabel::Good);
        assert_eq!(ReadabilityLabel::from_score(60), ReadabilityLabel::Fair);
        assert_eq!(ReadabilityLabel::from_score(12), ReadabilityLabel::Poor);
    }

    #[test]
    fn test_readability_parse() {
        assert_eq!(ReadabilityLabel::parse("Very Good"), Some(ReadabilityLabel::VeryGood));
        assert_eq!(ReadabilityLabel::parse("very_good"), Some(ReadabilityLabel::VeryGood));
        assert_eq!(ReadabilityLabel::parse(" EXCELLENT "), Some(ReadabilityLabel::Excellent));
        assert_eq!(ReadabilityLabel::parse("great"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let result = AnalysisResult {
            grammar_issues: 1,
            formatting_issues: 0,
            style_issues: 0,
            score: 88,
            readability: ReadabilityLabel::VeryGood,
            suggestions: vec![Suggestion::new(
                SuggestionType::Grammar,
                Severity::High,
                "Line 2: their/there",
                "there",
                "Wrong homophone",
            )],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["readability_score"], "Very Good");
        assert_eq!(value["suggestions"][0]["type"], "grammar");
        assert_eq!(value["suggestions"][0]["severity"], "high");
    }

    #[test]
    fn test_total_issues_saturates() {
        let result = AnalysisResult {
            grammar_issues: u32::MAX,
            formatting_issues: 1,
            style_issues: 7,
            score: 50,
            readability: ReadabilityLabel::Poor,
            suggestions: Vec::new(),
        };
        assert_eq!(result.total_issues(), u32::MAX);
    }

    #[test]
    fn test_enum_parse_is_lenient_on_case() {
        assert_eq!(SuggestionType::parse("Style"), Some(SuggestionType::Style));
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("critical"), None);
    }
}
