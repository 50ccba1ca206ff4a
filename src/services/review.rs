//! Document review service.
//!
//! Runs a file through the analysis pipeline and persists the document,
//! its analysis summary and its suggestions.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::analysis::{AnalysisOutcome, AnalysisPipeline, DegradedReason, PipelineEvent};
use crate::models::{AnalysisResult, DocumentStatus, NewDocument, SourceFile};
use crate::repository::{DocumentStore, StoreError};

/// Result of reviewing and storing one document.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub document_id: String,
    pub result: AnalysisResult,
    pub degraded: Option<DegradedReason>,
}

/// Service that reviews documents and records the results.
pub struct ReviewService {
    pipeline: Arc<AnalysisPipeline>,
    store: Arc<dyn DocumentStore>,
}

impl ReviewService {
    /// Create a new review service.
    pub fn new(pipeline: Arc<AnalysisPipeline>, store: Arc<dyn DocumentStore>) -> Self {
        Self { pipeline, store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Review a document and store the outcome.
    pub async fn review(&self, file: &SourceFile) -> Result<ReviewOutcome, StoreError> {
        let outcome = self.pipeline.analyze_detailed(file).await;
        self.persist(file, outcome).await
    }

    /// Review a document, forwarding pipeline progress to `event_tx`.
    pub async fn review_with_events(
        &self,
        file: &SourceFile,
        event_tx: mpsc::Sender<PipelineEvent>,
    ) -> Result<ReviewOutcome, StoreError> {
        let outcome = self.pipeline.analyze_with_events(file, event_tx).await;
        self.persist(file, outcome).await
    }

    async fn persist(
        &self,
        file: &SourceFile,
        outcome: AnalysisOutcome,
    ) -> Result<ReviewOutcome, StoreError> {
        let AnalysisOutcome {
            result,
            extraction,
            degraded,
        } = outcome;

        let id = self
            .store
            .create_document(NewDocument::from_source(file, extraction.text))
            .await?;

        if let Err(e) = self.save(&id, &result, degraded.is_some()).await {
            warn!("Failed to store analysis for {}: {}", id, e);
            if let Err(status_err) = self
                .store
                .update_status(&id, DocumentStatus::Failed, Some(&e.to_string()))
                .await
            {
                warn!("Could not mark {} as failed: {}", id, status_err);
            }
            return Err(e);
        }

        info!("Stored review of {} as {}", file.name, id);
        Ok(ReviewOutcome {
            document_id: id,
            result,
            degraded,
        })
    }

    async fn save(&self, id: &str, result: &AnalysisResult, degraded: bool) -> Result<(), StoreError> {
        self.store.save_analysis(id, result, degraded).await?;
        self.store.insert_suggestions(id, &result.suggestions).await?;
        Ok(())
    }
}
