//! End-to-end review tests: extraction, prompting, parsing and storage
//! against a scripted analysis backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use docreview::analysis::{AnalysisPipeline, DegradedReason, PipelineOptions};
use docreview::llm::{AnalysisBackend, AnalysisError};
use docreview::models::{
    DocumentStatus, ReadabilityLabel, Severity, SourceFile, SuggestionType,
};
use docreview::repository::{DocumentStore, SqliteDocumentStore};
use docreview::services::ReviewService;

const REPLY: &str = r#"Here is my analysis:
```json
{
  "grammar_issues": 1,
  "formatting_issues": 0,
  "style_issues": 1,
  "score": 85,
  "readability_score": "Very Good",
  "suggestions": [
    {
      "type": "grammar",
      "severity": "high",
      "line": 1,
      "original_text": "This are",
      "issue": "Subject-verb agreement",
      "suggestion": "This is",
      "explanation": "Singular subject takes a singular verb"
    },
    {
      "type": "style",
      "severity": "low",
      "issue": "Vague wording",
      "suggestion": "Be specific",
      "explanation": "Prefer concrete terms"
    }
  ]
}
```"#;

/// Records prompts and answers with a fixed reply.
struct ScriptedBackend {
    reply: Result<String, AnalysisError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn replying(reply: Result<&str, AnalysisError>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.map(str::to_string),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn request(&self, prompt: &str) -> Result<String, AnalysisError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

fn pipeline(backend: Arc<ScriptedBackend>) -> Arc<AnalysisPipeline> {
    Arc::new(AnalysisPipeline::new(backend, PipelineOptions::default()))
}

fn text_file(name: &str, content: &str) -> SourceFile {
    SourceFile::new(name, Some("text/plain".to_string()), content.as_bytes().to_vec())
}

#[tokio::test]
async fn test_plain_text_prompt_carries_line_count_and_text() {
    let backend = ScriptedBackend::replying(Ok(REPLY));
    let result = pipeline(backend.clone())
        .analyze(&text_file("notes.txt", "This is a test sentence."))
        .await;

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Total lines: 1"));
    assert!(prompts[0].contains("This is a test sentence."));

    assert_eq!(result.score, 85);
    assert_eq!(result.readability, ReadabilityLabel::VeryGood);
    assert_eq!(result.suggestions.len(), 2);
    assert_eq!(result.suggestions[0].issue, "Line 1: Subject-verb agreement");
    assert!(result.suggestions[0].explanation.contains("This are"));
}

#[tokio::test]
async fn test_broken_pdf_never_reaches_service() {
    let backend = ScriptedBackend::replying(Ok(REPLY));
    let file = SourceFile::new(
        "scan.pdf",
        Some("application/pdf".to_string()),
        b"%PDF-1.4 truncated garbage".to_vec(),
    );

    let outcome = pipeline(backend.clone()).analyze_detailed(&file).await;

    assert!(backend.prompts().is_empty());
    assert_eq!(outcome.degraded, Some(DegradedReason::ExtractionLimited));
    assert!(outcome.extraction.is_fallback_notice);
    assert!(outcome.extraction.text.contains("scan.pdf"));
    assert_eq!(outcome.result.score, 50);
    assert_eq!(outcome.result.suggestions.len(), 1);
    assert_eq!(outcome.result.suggestions[0].kind, SuggestionType::Formatting);
    assert_eq!(outcome.result.suggestions[0].severity, Severity::Medium);
}

#[tokio::test]
async fn test_service_failure_yields_service_default() {
    let backend = ScriptedBackend::replying(Err(AnalysisError::NetworkFailure(
        "request timed out".to_string(),
    )));
    let outcome = pipeline(backend)
        .analyze_detailed(&text_file("notes.txt", "Some words."))
        .await;

    assert_eq!(outcome.degraded, Some(DegradedReason::ServiceUnavailable));
    assert_eq!(outcome.result.score, 70);
    assert_eq!(outcome.result.total_issues(), 0);
    assert_eq!(outcome.result.readability, ReadabilityLabel::Fair);
    assert_eq!(outcome.result.suggestions[0].kind, SuggestionType::Grammar);
    assert_eq!(
        outcome.result.suggestions[0].issue,
        "Failed to perform document analysis"
    );
}

#[tokio::test]
async fn test_unparseable_reply_yields_service_default() {
    let backend = ScriptedBackend::replying(Ok("I could not analyze this document."));
    let result = pipeline(backend)
        .analyze(&text_file("notes.txt", "Some words."))
        .await;
    assert_eq!(result.score, 70);
}

#[tokio::test]
async fn test_review_is_persisted() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteDocumentStore::new(&dir.path().join("reviews.db")).unwrap());
    let backend = ScriptedBackend::replying(Ok(REPLY));
    let service = ReviewService::new(pipeline(backend), store.clone());

    let outcome = service
        .review(&text_file("notes.txt", "This are a test sentence."))
        .await
        .unwrap();
    assert!(outcome.degraded.is_none());

    let doc = store.get_document(&outcome.document_id).await.unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Analyzed);
    assert_eq!(doc.name, "notes.txt");
    assert_eq!(doc.content, "This are a test sentence.");
    assert_eq!(doc.score, Some(85));
    assert_eq!(doc.readability, Some(ReadabilityLabel::VeryGood));
    assert!(!doc.degraded);

    let suggestions = store.get_suggestions(&outcome.document_id).await.unwrap();
    assert_eq!(suggestions, outcome.result.suggestions);
}

#[tokio::test]
async fn test_degraded_review_is_flagged_in_store() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteDocumentStore::new(&dir.path().join("reviews.db")).unwrap());
    let backend = ScriptedBackend::replying(Ok(REPLY));
    let service = ReviewService::new(pipeline(backend), store.clone());

    let file = SourceFile::new("memo.doc", Some("application/msword".to_string()), b"x".to_vec());
    let outcome = service.review(&file).await.unwrap();

    let doc = store.get_document(&outcome.document_id).await.unwrap().unwrap();
    assert!(doc.degraded);
    assert_eq!(doc.score, Some(50));
    assert!(doc.content.contains("memo.doc"));
}
