//! Configuration and service availability check.

use console::style;

use crate::config::{Config, Settings};
use crate::llm::LlmClient;
use crate::utils::format_size;

/// Mask an API key for display, keeping only the last four characters.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

/// Report LLM settings, reachability and storage location.
pub async fn cmd_check(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    let llm = &config.llm;

    println!("\n{}", style("Configuration:").cyan());
    match config.source_path {
        Some(ref path) => println!("  {:<15} {}", "Config file", path.display()),
        None => println!("  {:<15} {}", "Config file", style("none (defaults)").dim()),
    }
    let db_path = settings.database_path();
    match std::fs::metadata(&db_path) {
        Ok(meta) => println!(
            "  {:<15} {} ({})",
            "Database",
            db_path.display(),
            format_size(meta.len())
        ),
        Err(_) => println!(
            "  {:<15} {} {}",
            "Database",
            db_path.display(),
            style("(not created yet)").dim()
        ),
    }
    println!("  {:<15} {}", "Min PDF chars", config.extraction.min_pdf_chars);

    println!("\n{}", style("Language model:").cyan());
    println!("  {:<15} {}", "Provider", llm.provider.as_str());
    println!("  {:<15} {}", "Endpoint", llm.endpoint);
    println!("  {:<15} {}", "Model", llm.model);
    println!("  {:<15} {}s", "Timeout", llm.request_timeout_secs);
    let key_status = match llm.api_key {
        Some(ref key) if !key.is_empty() => style(mask_key(key)).dim(),
        _ if llm.provider.requires_api_key() => style("✗ missing".to_string()).red(),
        _ => style("not required".to_string()).dim(),
    };
    println!("  {:<15} {}", "API key", key_status);

    if !llm.enabled {
        println!(
            "\n{} Analysis is disabled; every review will return a placeholder result",
            style("!").yellow()
        );
        return Ok(());
    }

    let client = LlmClient::new(llm.clone());
    let status = if client.is_available().await {
        style("✓ reachable").green()
    } else {
        style("✗ not reachable").red()
    };
    println!("  {:<15} {}", "Service", status);

    match client.list_models().await {
        Ok(models) => {
            let configured = models.iter().any(|m| m == &llm.model);
            println!(
                "  {:<15} {} available{}",
                "Models",
                models.len(),
                if configured {
                    String::new()
                } else {
                    format!(" ({} not listed)", llm.model)
                }
            );
        }
        Err(e) => println!("  {:<15} {}", "Models", style(e).dim()),
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abc"), "***");
        assert_eq!(mask_key("sk-1234567890"), "*********7890");
    }
}
