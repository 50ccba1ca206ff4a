//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod check;
mod documents;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

/// Output format for listings and results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON
    Json,
}

#[derive(Parser)]
#[command(name = "docreview")]
#[command(about = "Review documents for grammar, formatting and style issues")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more documents
    Analyze {
        /// Files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Declared MIME type (detected from content or extension if omitted)
        #[arg(long)]
        mime: Option<String>,
        /// Print results without storing them
        #[arg(long)]
        no_store: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List reviewed documents
    Ls {
        /// Maximum documents to show (0 = all)
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show a reviewed document and its suggestions
    Show {
        /// Document ID (a unique prefix is enough)
        id: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Check LLM configuration and availability
    Check,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (settings, config) = load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Analyze {
            files,
            mime,
            no_store,
            format,
        } => analyze::cmd_analyze(&settings, &config, &files, mime, no_store, format).await,
        Commands::Ls { limit, format } => documents::cmd_ls(&settings, limit, format).await,
        Commands::Show { id, format } => documents::cmd_show(&settings, &id, format).await,
        Commands::Check => check::cmd_check(&settings, &config).await,
    }
}
