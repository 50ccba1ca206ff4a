//! End-to-end document analysis: classify, extract, prompt, request, parse.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::defaults::{extraction_default, service_default};
use super::types::{AnalysisOutcome, DegradedReason, PipelineEvent};
use crate::extraction::{image_pdf_notice, ExtractionResult, TextExtractor, DEFAULT_MIN_PDF_CHARS};
use crate::llm::prompts::DEFAULT_MAX_CONTENT_CHARS;
use crate::llm::{parse, AnalysisBackend, PromptBuilder, PromptError};
use crate::models::{AnalysisResult, SourceFile};
use crate::utils::{classify, FileCategory};

/// Tunables for a pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// PDFs yielding fewer characters than this are treated as image-based.
    pub min_pdf_chars: usize,
    /// Cap on document bytes included in the prompt.
    pub max_content_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            min_pdf_chars: DEFAULT_MIN_PDF_CHARS,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

/// Document analysis pipeline.
///
/// Every entry point returns a fully populated [`AnalysisResult`]. Failures
/// are logged and replaced with a degraded default, never surfaced.
pub struct AnalysisPipeline {
    backend: Arc<dyn AnalysisBackend>,
    extractor: TextExtractor,
    prompts: PromptBuilder,
}

impl AnalysisPipeline {
    pub fn new(backend: Arc<dyn AnalysisBackend>, options: PipelineOptions) -> Self {
        Self {
            backend,
            extractor: TextExtractor::new().with_min_pdf_chars(options.min_pdf_chars),
            prompts: PromptBuilder::new(options.max_content_chars),
        }
    }

    /// Analyze a document.
    pub async fn analyze(&self, file: &SourceFile) -> AnalysisResult {
        self.run(file, None).await.result
    }

    /// Analyze a document, keeping the extracted text and degradation reason.
    pub async fn analyze_detailed(&self, file: &SourceFile) -> AnalysisOutcome {
        self.run(file, None).await
    }

    /// Analyze a document, reporting progress on `events`.
    ///
    /// A closed receiver does not affect the analysis.
    pub async fn analyze_with_events(
        &self,
        file: &SourceFile,
        events: mpsc::Sender<PipelineEvent>,
    ) -> AnalysisOutcome {
        self.run(file, Some(&events)).await
    }

    /// Analyze a document unless `cancel` resolves first.
    ///
    /// Cancellation yields the service-unavailable default.
    pub async fn analyze_until<F>(&self, file: &SourceFile, cancel: F) -> AnalysisResult
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            outcome = self.run(file, None) => outcome.result,
            _ = cancel => {
                warn!("Analysis of {} cancelled", file.name);
                service_default()
            }
        }
    }

    /// Classify and extract without contacting the analysis service.
    pub async fn extract(&self, file: &SourceFile) -> (FileCategory, ExtractionResult) {
        let category = classify(file.mime_type.as_deref(), &file.name);
        (category, self.extract_text(file, category).await)
    }

    async fn run(
        &self,
        file: &SourceFile,
        events: Option<&mpsc::Sender<PipelineEvent>>,
    ) -> AnalysisOutcome {
        let category = classify(file.mime_type.as_deref(), &file.name);
        debug!("Classified {} as {}", file.name, category.id());
        emit(
            events,
            PipelineEvent::Classified {
                file_name: file.name.clone(),
                category,
            },
        );

        let extraction = self.extract_text(file, category).await;
        emit(
            events,
            PipelineEvent::Extracted {
                chars: extraction.text.chars().count(),
                is_fallback_notice: extraction.is_fallback_notice,
                page_count: extraction.page_count,
            },
        );

        let (result, degraded) = match self.prompts.request(&extraction) {
            Err(PromptError::FallbackNotice) => {
                info!(
                    "{}: no analyzable text, using extraction default",
                    file.name
                );
                (extraction_default(), Some(DegradedReason::ExtractionLimited))
            }
            Ok(request) => {
                emit(
                    events,
                    PipelineEvent::RequestSent {
                        line_count: request.line_count,
                    },
                );
                match self.request_analysis(&request.render(), events).await {
                    Some(result) => (result, None),
                    None => (service_default(), Some(DegradedReason::ServiceUnavailable)),
                }
            }
        };

        info!(
            "{}: score {} ({}), {} suggestions",
            file.name,
            result.score,
            result.readability,
            result.suggestions.len()
        );
        emit(events, PipelineEvent::Completed { degraded });

        AnalysisOutcome {
            result,
            extraction,
            degraded,
        }
    }

    async fn request_analysis(
        &self,
        prompt: &str,
        events: Option<&mpsc::Sender<PipelineEvent>>,
    ) -> Option<AnalysisResult> {
        let raw = match self.backend.request(prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Analysis request failed: {}", e);
                return None;
            }
        };
        emit(
            events,
            PipelineEvent::ResponseReceived {
                chars: raw.chars().count(),
            },
        );

        match parse(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Could not parse analysis reply: {}", e);
                debug!("Unparseable reply: {}", raw);
                None
            }
        }
    }

    async fn extract_text(&self, file: &SourceFile, category: FileCategory) -> ExtractionResult {
        if category != FileCategory::Pdf {
            return self.extractor.extract(file, category);
        }

        // PDF parsing is CPU-bound.
        let extractor = self.extractor.clone();
        let owned = file.clone();
        match tokio::task::spawn_blocking(move || extractor.extract(&owned, category)).await {
            Ok(result) => result,
            Err(e) => {
                warn!("PDF extraction task failed for {}: {}", file.name, e);
                ExtractionResult {
                    text: image_pdf_notice(&file.name, file.size_bytes),
                    is_fallback_notice: true,
                    page_count: None,
                }
            }
        }
    }
}

/// Best-effort progress report; full or closed channels drop the event.
fn emit(events: Option<&mpsc::Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        let _ = tx.try_send(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::extraction::test_support::make_test_pdf;
    use crate::llm::AnalysisError;
    use crate::models::{ReadabilityLabel, SuggestionType};

    /// Backend replying with a fixed result and recording prompts.
    struct StubBackend {
        reply: Result<String, AnalysisError>,
        calls: AtomicUsize,
        last_prompt: std::sync::Mutex<Option<String>>,
    }

    impl StubBackend {
        fn new(reply: Result<&str, AnalysisError>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                calls: AtomicUsize::new(0),
                last_prompt: std::sync::Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl AnalysisBackend for StubBackend {
        async fn request(&self, prompt: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply.clone()
        }
    }

    const REPLY: &str = r#"{"grammar_issues":0,"formatting_issues":0,"style_issues":1,"score":88,"readability_score":"Very Good","suggestions":[{"type":"style","severity":"low","issue":"Passive voice","line":1,"suggestion":"Use active voice","explanation":"Clearer"}]}"#;

    fn pipeline(backend: Arc<StubBackend>) -> AnalysisPipeline {
        AnalysisPipeline::new(backend, PipelineOptions::default())
    }

    #[tokio::test]
    async fn test_plain_text_success() {
        let backend = StubBackend::new(Ok(REPLY));
        let file = SourceFile::new(
            "notes.txt",
            Some("text/plain".into()),
            b"This is a test sentence.".to_vec(),
        );

        let outcome = pipeline(backend.clone()).analyze_detailed(&file).await;
        assert_eq!(outcome.result.score, 88);
        assert_eq!(outcome.result.readability, ReadabilityLabel::VeryGood);
        assert_eq!(outcome.result.suggestions[0].issue, "Line 1: Passive voice");
        assert!(outcome.degraded.is_none());

        let prompt = backend.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Total lines: 1"));
    }

    #[tokio::test]
    async fn test_fallback_notice_skips_backend() {
        let backend = StubBackend::new(Ok(REPLY));
        let file = SourceFile::new("memo.doc", Some("application/msword".into()), b"x".to_vec());

        let outcome = pipeline(backend.clone()).analyze_detailed(&file).await;
        assert_eq!(outcome.result, extraction_default());
        assert_eq!(outcome.degraded, Some(DegradedReason::ExtractionLimited));
        assert!(outcome.extraction.is_fallback_notice);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_network_failure_uses_service_default() {
        let backend = StubBackend::new(Err(AnalysisError::NetworkFailure("timeout".into())));
        let file = SourceFile::new("a.txt", None, b"Some words here.".to_vec());

        let result = pipeline(backend).analyze(&file).await;
        assert_eq!(result.score, 70);
        assert_eq!(result.suggestions[0].kind, SuggestionType::Grammar);
    }

    #[tokio::test]
    async fn test_unparseable_reply_uses_service_default() {
        let backend = StubBackend::new(Ok("I'm sorry, I can't do that."));
        let file = SourceFile::new("a.txt", None, b"Some words here.".to_vec());

        let outcome = pipeline(backend).analyze_detailed(&file).await;
        assert_eq!(outcome.result, service_default());
        assert_eq!(outcome.degraded, Some(DegradedReason::ServiceUnavailable));
    }

    #[tokio::test]
    async fn test_zero_byte_and_absent_mime_are_total() {
        let backend = StubBackend::new(Ok(REPLY));
        let p = pipeline(backend);

        let empty = SourceFile::new("empty.txt", None, Vec::new());
        assert_eq!(p.analyze(&empty).await.score, 50);

        let fake_pdf = SourceFile::new(
            "fake.pdf",
            Some("application/pdf".into()),
            b"not a pdf at all".to_vec(),
        );
        assert_eq!(p.analyze(&fake_pdf).await, extraction_default());

        let no_mime = SourceFile::new("README", None, b"Readable words.".to_vec());
        assert_eq!(p.analyze(&no_mime).await.score, 88);
    }

    #[tokio::test]
    async fn test_real_pdf_is_analyzed() {
        let backend = StubBackend::new(Ok(REPLY));
        let bytes = make_test_pdf(&[
            "This report covers the annual results of the regional offices",
            "The second page lists the recommendations for the coming year",
        ]);
        let file = SourceFile::new("report.pdf", Some("application/pdf".into()), bytes);

        let outcome = pipeline(backend.clone()).analyze_detailed(&file).await;
        assert!(!outcome.extraction.is_fallback_notice);
        assert_eq!(outcome.extraction.page_count, Some(2));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let backend = StubBackend::new(Ok(REPLY));
        let file = SourceFile::new("notes.txt", None, b"One line.".to_vec());
        let (tx, mut rx) = mpsc::channel(16);

        pipeline(backend).analyze_with_events(&file, tx).await;

        let mut names = Vec::new();
        while let Some(event) = rx.recv().await {
            names.push(match event {
                PipelineEvent::Classified { category, .. } => {
                    assert_eq!(category, FileCategory::PlainText);
                    "classified"
                }
                PipelineEvent::Extracted { .. } => "extracted",
                PipelineEvent::RequestSent { line_count } => {
                    assert_eq!(line_count, 1);
                    "request"
                }
                PipelineEvent::ResponseReceived { .. } => "response",
                PipelineEvent::Completed { degraded } => {
                    assert!(degraded.is_none());
                    "completed"
                }
            });
        }
        assert_eq!(
            names,
            vec!["classified", "extracted", "request", "response", "completed"]
        );
    }

    #[tokio::test]
    async fn test_closed_receiver_is_ignored() {
        let backend = StubBackend::new(Ok(REPLY));
        let file = SourceFile::new("notes.txt", None, b"One line.".to_vec());
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let outcome = pipeline(backend).analyze_with_events(&file, tx).await;
        assert_eq!(outcome.result.score, 88);
    }

    #[tokio::test]
    async fn test_unread_receiver_does_not_block() {
        let backend = StubBackend::new(Ok(REPLY));
        let file = SourceFile::new("notes.txt", None, b"One line.".to_vec());
        let (tx, _rx) = mpsc::channel(1);

        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(3),
            pipeline(backend).analyze_with_events(&file, tx),
        )
        .await
        .expect("analysis blocked on a full progress channel");
        assert_eq!(outcome.result.score, 88);
    }

    #[tokio::test]
    async fn test_cancellation_uses_service_default() {
        struct HangingBackend;

        #[async_trait]
        impl AnalysisBackend for HangingBackend {
            async fn request(&self, _prompt: &str) -> Result<String, AnalysisError> {
                std::future::pending().await
            }
        }

        let p = AnalysisPipeline::new(Arc::new(HangingBackend), PipelineOptions::default());
        let file = SourceFile::new("notes.txt", None, b"One line.".to_vec());

        let result = p
            .analyze_until(&file, tokio::time::sleep(std::time::Duration::from_millis(20)))
            .await;
        assert_eq!(result, service_default());
    }
}
