//! Stored document listing and detail commands.

use console::style;
use serde_json::json;

use crate::cli::helpers::{print_suggestions, styled_readability, styled_score, truncate};
use crate::config::Settings;
use crate::models::{DocumentRecord, DocumentStatus};
use crate::repository::{DocumentStore, SqliteDocumentStore};
use crate::utils::{format_kb, mime_label};

use super::OutputFormat;

fn open_store(settings: &Settings) -> anyhow::Result<Option<SqliteDocumentStore>> {
    if !settings.database_exists() {
        println!(
            "{} No documents reviewed yet (database {} does not exist)",
            style("!").yellow(),
            settings.database_path().display()
        );
        return Ok(None);
    }
    Ok(Some(SqliteDocumentStore::new(&settings.database_path())?))
}

/// List reviewed documents, newest first.
pub async fn cmd_ls(settings: &Settings, limit: usize, format: OutputFormat) -> anyhow::Result<()> {
    let Some(store) = open_store(settings)? else {
        return Ok(());
    };
    let docs = store.list_documents(limit).await?;

    if format == OutputFormat::Json {
        let items: Vec<_> = docs.iter().map(document_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if docs.is_empty() {
        println!("{} No documents found", style("!").yellow());
        return Ok(());
    }

    println!(
        "\n{:<10} {:<36} {:<5} {:>10} {:>5} {:<10} {:>6}",
        "ID", "Name", "Type", "Size", "Score", "Readab.", "Issues"
    );
    println!("{}", "-".repeat(90));

    for doc in &docs {
        let id_short = &doc.id[..8.min(doc.id.len())];
        let score = match doc.score {
            Some(score) => styled_score(score).to_string(),
            None => format!("{:>3}", style("-").dim()),
        };
        let readability = doc.readability.map(|r| r.as_str()).unwrap_or("-");
        let marker = match doc.status {
            DocumentStatus::Failed => style("✗").red().to_string(),
            _ if doc.degraded => style("!").yellow().to_string(),
            _ => " ".to_string(),
        };
        println!(
            "{:<10} {:<36} {:<5} {:>10} {:>5} {:<10} {:>6} {}",
            id_short,
            truncate(&doc.name, 36),
            mime_label(doc.mime_type.as_deref()),
            format_kb(doc.size_bytes),
            score,
            readability,
            doc.total_issues(),
            marker
        );
    }

    println!("\n{} documents", docs.len());
    Ok(())
}

/// Show one document's review and suggestions.
pub async fn cmd_show(settings: &Settings, id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let Some(store) = open_store(settings)? else {
        return Ok(());
    };
    let doc = resolve(&store, id).await?;
    let suggestions = store.get_suggestions(&doc.id).await?;

    if format == OutputFormat::Json {
        let mut value = document_json(&doc);
        value["content"] = json!(doc.content);
        value["suggestions"] = serde_json::to_value(&suggestions)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("\n{}", style(&doc.name).bold());
    println!("{}", "-".repeat(60));
    println!("  {:<14} {}", "ID:", doc.id);
    println!(
        "  {:<14} {} ({})",
        "Type:",
        mime_label(doc.mime_type.as_deref()),
        doc.mime_type.as_deref().unwrap_or("unknown")
    );
    println!("  {:<14} {}", "Size:", format_kb(doc.size_bytes));
    println!("  {:<14} {}", "Status:", doc.status.as_str());
    println!(
        "  {:<14} {}",
        "Reviewed:",
        doc.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(ref error) = doc.error {
        println!("  {:<14} {}", "Error:", style(error).red());
    }
    if doc.degraded {
        println!(
            "  {} Stored result is a placeholder; the document was not fully analyzed",
            style("!").yellow()
        );
    }

    if let (Some(score), Some(readability)) = (doc.score, doc.readability) {
        println!("  {:<14} {}/100", "Score:", styled_score(score));
        println!("  {:<14} {}", "Readability:", styled_readability(readability));
        println!(
            "  {:<14} {} grammar, {} formatting, {} style",
            "Issues:",
            doc.grammar_issues.unwrap_or(0),
            doc.formatting_issues.unwrap_or(0),
            doc.style_issues.unwrap_or(0)
        );
        print_suggestions(&suggestions);
    }

    Ok(())
}

/// Find a document by full ID or unique ID prefix.
async fn resolve(store: &SqliteDocumentStore, id: &str) -> anyhow::Result<DocumentRecord> {
    if let Some(doc) = store.get_document(id).await? {
        return Ok(doc);
    }

    let mut matches: Vec<_> = store
        .list_documents(0)
        .await?
        .into_iter()
        .filter(|d| d.id.starts_with(id))
        .collect();
    match matches.len() {
        0 => anyhow::bail!("Document not found: {}", id),
        1 => Ok(matches.remove(0)),
        n => anyhow::bail!("ID prefix '{}' matches {} documents", id, n),
    }
}

fn document_json(doc: &DocumentRecord) -> serde_json::Value {
    json!({
        "id": doc.id,
        "name": doc.name,
        "mime_type": doc.mime_type,
        "size_bytes": doc.size_bytes,
        "status": doc.status,
        "degraded": doc.degraded,
        "error": doc.error,
        "score": doc.score,
        "readability_score": doc.readability,
        "grammar_issues": doc.grammar_issues,
        "formatting_issues": doc.formatting_issues,
        "style_issues": doc.style_issues,
        "created_at": doc.created_at.to_rfc3339(),
        "updated_at": doc.updated_at.to_rfc3339(),
    })
}
