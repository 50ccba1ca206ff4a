//! Document analysis command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use console::style;
use indicatif::ProgressBar;
use serde_json::json;
use tokio::sync::mpsc;

use crate::analysis::{AnalysisOutcome, AnalysisPipeline, DegradedReason, PipelineEvent};
use crate::cli::helpers::{print_suggestions, print_summary, spinner, truncate};
use crate::config::{Config, Settings};
use crate::llm::LlmClient;
use crate::models::{AnalysisResult, SourceFile};
use crate::repository::SqliteDocumentStore;
use crate::services::ReviewService;
use crate::utils::{format_kb, sniff_mime};

use super::OutputFormat;

/// One analyzed file, ready for display.
struct Reviewed {
    file_name: String,
    size_bytes: u64,
    document_id: Option<String>,
    result: AnalysisResult,
    degraded: Option<DegradedReason>,
}

/// Analyze files, storing results unless `no_store` is set.
pub async fn cmd_analyze(
    settings: &Settings,
    config: &Config,
    files: &[PathBuf],
    mime: Option<String>,
    no_store: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = LlmClient::new(config.llm.clone());
    if !config.llm.has_credentials() {
        eprintln!(
            "{} No API key configured for {}; results will be degraded defaults",
            style("!").yellow(),
            config.llm.provider.as_str()
        );
    }
    let pipeline = Arc::new(AnalysisPipeline::new(
        Arc::new(client),
        config.pipeline_options(),
    ));

    let service = if no_store {
        None
    } else {
        settings
            .ensure_directories()
            .context("Failed to create data directory")?;
        let store = SqliteDocumentStore::new(&settings.database_path())
            .context("Failed to open document database")?;
        Some(ReviewService::new(pipeline.clone(), Arc::new(store)))
    };

    let mut reviewed = Vec::new();
    let mut failed = 0usize;

    for path in files {
        let file = match read_source(path, mime.clone()).await {
            Ok(f) => f,
            Err(e) => {
                eprintln!("{} {}: {:#}", style("✗").red(), path.display(), e);
                failed += 1;
                continue;
            }
        };

        let pb = (format == OutputFormat::Table)
            .then(|| spinner(&format!("Reviewing {}", truncate(&file.name, 40))));
        let (event_tx, event_rx) = mpsc::channel::<PipelineEvent>(16);
        let handler = tokio::spawn(show_progress(event_rx, pb.clone()));

        let outcome = match &service {
            Some(service) => service
                .review_with_events(&file, event_tx)
                .await
                .map(|o| (Some(o.document_id), o.result, o.degraded)),
            None => {
                let AnalysisOutcome {
                    result, degraded, ..
                } = pipeline.analyze_with_events(&file, event_tx).await;
                Ok((None, result, degraded))
            }
        };
        let _ = handler.await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        match outcome {
            Ok((document_id, result, degraded)) => reviewed.push(Reviewed {
                file_name: file.name.clone(),
                size_bytes: file.size_bytes,
                document_id,
                result,
                degraded,
            }),
            Err(e) => {
                eprintln!("{} {}: {}", style("✗").red(), file.name, e);
                failed += 1;
            }
        }
    }

    match format {
        OutputFormat::Table => reviewed.iter().for_each(print_reviewed),
        OutputFormat::Json => {
            let items: Vec<_> = reviewed
                .iter()
                .map(|r| {
                    json!({
                        "file": r.file_name,
                        "size_bytes": r.size_bytes,
                        "document_id": r.document_id,
                        "degraded": r.degraded.map(|d| d.as_str()),
                        "analysis": r.result,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files could not be reviewed", failed, files.len());
    }
    Ok(())
}

/// Read a file, filling in its MIME type from content when not declared.
async fn read_source(path: &Path, mime: Option<String>) -> anyhow::Result<SourceFile> {
    let mut file = SourceFile::from_path(path, mime)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if file.mime_type.is_none() {
        file.mime_type = sniff_mime(&file.raw_bytes);
    }
    Ok(file)
}

async fn show_progress(mut event_rx: mpsc::Receiver<PipelineEvent>, pb: Option<ProgressBar>) {
    while let Some(event) = event_rx.recv().await {
        let Some(ref pb) = pb else { continue };
        match event {
            PipelineEvent::Classified { category, .. } => {
                pb.set_message(format!("Extracting text {}", category.icon()));
            }
            PipelineEvent::Extracted {
                is_fallback_notice: true,
                ..
            } => pb.set_message("Text could not be extracted"),
            PipelineEvent::Extracted { chars, .. } => {
                pb.set_message(format!("Extracted {} characters", chars));
            }
            PipelineEvent::RequestSent { line_count } => {
                pb.set_message(format!("Analyzing {} lines...", line_count));
            }
            PipelineEvent::ResponseReceived { .. } => pb.set_message("Parsing analysis..."),
            PipelineEvent::Completed { .. } => {}
        }
    }
}

fn print_reviewed(r: &Reviewed) {
    println!(
        "\n{} {} ({})",
        style("■").cyan(),
        style(&r.file_name).bold(),
        format_kb(r.size_bytes)
    );
    if let Some(ref id) = r.document_id {
        println!("  {:<14} {}", "Document:", style(id).dim());
    }
    match r.degraded {
        Some(DegradedReason::ExtractionLimited) => println!(
            "  {} Text could not be extracted; showing a placeholder result",
            style("!").yellow()
        ),
        Some(DegradedReason::ServiceUnavailable) => println!(
            "  {} Analysis service unavailable; showing a placeholder result",
            style("!").yellow()
        ),
        None => {}
    }
    print_summary(&r.result);
    print_suggestions(&r.result.suggestions);
}
