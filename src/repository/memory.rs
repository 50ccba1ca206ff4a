//! In-memory document store for tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{DocumentStore, Result, StoreError};
use crate::models::{AnalysisResult, DocumentRecord, DocumentStatus, NewDocument, Suggestion};

#[derive(Default)]
struct State {
    /// Insertion order
    documents: Vec<DocumentRecord>,
    suggestions: HashMap<String, Vec<Suggestion>>,
}

impl State {
    fn find_mut(&mut self, id: &str) -> Result<&mut DocumentRecord> {
        self.documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// Non-durable [`DocumentStore`].
#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: RwLock<State>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_document(&self, doc: NewDocument) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let record = DocumentRecord {
            id: id.clone(),
            name: doc.name,
            mime_type: doc.mime_type,
            size_bytes: doc.size_bytes,
            content_hash: doc.content_hash,
            content: doc.content,
            status: DocumentStatus::Analyzing,
            score: None,
            grammar_issues: None,
            formatting_issues: None,
            style_issues: None,
            readability: None,
            degraded: false,
            error: None,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.documents.push(record);
        Ok(id)
    }

    async fn update_status(
        &self,
        id: &str,
        status: DocumentStatus,
        error: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let doc = state.find_mut(id)?;
        doc.status = status;
        doc.error = error.map(str::to_string);
        doc.updated_at = Utc::now();
        Ok(())
    }

    async fn save_analysis(
        &self,
        id: &str,
        result: &AnalysisResult,
        degraded: bool,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let doc = state.find_mut(id)?;
        doc.status = DocumentStatus::Analyzed;
        doc.score = Some(result.score);
        doc.grammar_issues = Some(result.grammar_issues);
        doc.formatting_issues = Some(result.formatting_issues);
        doc.style_issues = Some(result.style_issues);
        doc.readability = Some(result.readability);
        doc.degraded = degraded;
        doc.error = None;
        doc.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_suggestions(&self, id: &str, suggestions: &[Suggestion]) -> Result<usize> {
        let mut state = self.state.write().await;
        state.find_mut(id)?;
        state
            .suggestions
            .entry(id.to_string())
            .or_default()
            .extend_from_slice(suggestions);
        Ok(suggestions.len())
    }

    async fn get_document(&self, id: &str) -> Result<Option<DocumentRecord>> {
        let state = self.state.read().await;
        Ok(state.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list_documents(&self, limit: usize) -> Result<Vec<DocumentRecord>> {
        let state = self.state.read().await;
        let newest_first = state.documents.iter().rev().cloned();
        Ok(if limit == 0 {
            newest_first.collect()
        } else {
            newest_first.take(limit).collect()
        })
    }

    async fn get_suggestions(&self, id: &str) -> Result<Vec<Suggestion>> {
        let state = self.state.read().await;
        Ok(state.suggestions.get(id).cloned().unwrap_or_default())
    }
}
