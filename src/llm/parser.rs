//! Parsing of model replies into validated analysis results.
//!
//! Models do not reliably return bare JSON. Candidates are tried in order:
//! the whole reply, the interior of a fenced code block, every balanced
//! `{...}` span, and finally the span from the first `{` to the last `}`.
//! The first candidate that decodes to a valid record wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::{AnalysisResult, ReadabilityLabel, Severity, Suggestion, SuggestionType};

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?\s*(\{[\s\S]*?\})\s*```").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no JSON object found in model reply")]
    NoJson,

    #[error("JSON found in model reply but none matched the analysis schema")]
    InvalidSchema,
}

/// Parse a raw model reply into an [`AnalysisResult`].
pub fn parse(raw: &str) -> Result<AnalysisResult, ParseError> {
    let mut saw_object = false;

    for candidate in candidates(raw) {
        let value: Value = match serde_json::from_str(candidate) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let Some(obj) = value.as_object() else {
            continue;
        };
        saw_object = true;
        match decode_record(obj) {
            Some(result) => return Ok(result),
            None => debug!("JSON candidate rejected: missing or invalid score"),
        }
    }

    if saw_object {
        Err(ParseError::InvalidSchema)
    } else {
        Err(ParseError::NoJson)
    }
}

/// Candidate JSON texts in the order they should be tried.
fn candidates(raw: &str) -> Vec<&str> {
    let trimmed = raw.trim();
    let mut out = vec![trimmed];

    out.extend(
        FENCED_JSON
            .captures_iter(trimmed)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str()),
    );

    out.extend(
        trimmed
            .match_indices('{')
            .filter_map(|(start, _)| balanced_object_at(trimmed, start)),
    );

    if let (Some(first), Some(last)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if first < last {
            out.push(&trimmed[first..=last]);
        }
    }

    out
}

/// The balanced `{...}` span starting at `start`, honouring string literals.
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode one JSON object. `None` means the candidate is not a valid record.
fn decode_record(obj: &Map<String, Value>) -> Option<AnalysisResult> {
    let score = obj.get("score").and_then(lenient_number)?;
    let score = score.round().clamp(0.0, 100.0) as u8;

    let suggestions: Vec<Suggestion> = obj
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(decode_suggestion).collect())
        .unwrap_or_default();

    let count = |field: &str, kind: SuggestionType| -> u32 {
        obj.get(field)
            .and_then(lenient_number)
            .map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
            .unwrap_or_else(|| suggestions.iter().filter(|s| s.kind == kind).count() as u32)
    };

    let grammar_issues = count("grammar_issues", SuggestionType::Grammar);
    let formatting_issues = count("formatting_issues", SuggestionType::Formatting);
    let style_issues = count("style_issues", SuggestionType::Style);

    let readability = obj
        .get("readability_score")
        .or_else(|| obj.get("readability"))
        .and_then(Value::as_str)
        .and_then(ReadabilityLabel::parse)
        .unwrap_or_else(|| ReadabilityLabel::from_score(score));

    Some(AnalysisResult {
        grammar_issues,
        formatting_issues,
        style_issues,
        score,
        readability,
        suggestions,
    })
}

fn decode_suggestion(value: &Value) -> Option<Suggestion> {
    let obj = value.as_object()?;

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(SuggestionType::parse);
    let severity = obj
        .get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse);
    let issue = obj.get("issue").and_then(Value::as_str);

    let (Some(kind), Some(severity), Some(issue)) = (kind, severity, issue) else {
        debug!("Dropping malformed suggestion: {}", value);
        return None;
    };

    let text = |field: &str| {
        obj.get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let line = obj
        .get("line")
        .and_then(lenient_number)
        .filter(|n| *n >= 1.0 && n.fract() == 0.0)
        .map(|n| n as u64);
    let issue = match line {
        Some(line) => format!("Line {}: {}", line, issue),
        None => issue.to_string(),
    };

    let explanation = match obj
        .get("original_text")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
    {
        Some(original) => format!("Original text: \"{}\". {}", original, text("explanation")),
        None => text("explanation"),
    };

    Some(Suggestion {
        kind,
        severity,
        issue,
        suggestion: text("suggestion"),
        explanation,
    })
}

/// A finite number, or a string holding one.
fn lenient_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
