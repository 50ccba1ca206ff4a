//! Configuration management for docreview using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::PipelineOptions;
use crate::extraction::DEFAULT_MIN_PDF_CHARS;
use crate::llm::LlmConfig;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "docreview.db";

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// PDFs with less text than this are treated as image-based.
    #[serde(default = "default_min_pdf_chars")]
    pub min_pdf_chars: usize,
}

fn default_min_pdf_chars() -> usize {
    DEFAULT_MIN_PDF_CHARS
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_pdf_chars: default_min_pdf_chars(),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename.
    pub database_filename: String,
    /// Explicit database path (overrides data_dir/database_filename if set).
    /// Set via DATABASE_PATH env var.
    pub database_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        // Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docreview");

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_path: None,
        }
    }
}

impl Settings {
    /// Get the full path to the database.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(&self.database_filename))
    }

    /// Check if the database file exists.
    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        if let Some(parent) = self.database_path().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// LLM configuration for document analysis.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Text extraction configuration.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers docreview config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("docreview").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        warn!("Ignoring config at {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file path.
    /// Format is chosen by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        // Environment wins over file values.
        config.llm = config.llm.with_env_overrides();
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config: Self = match ext {
            "toml" => toml::from_str(contents)?,
            "yaml" | "yml" => serde_yaml::from_str(contents)?,
            _ => serde_json::from_str(contents)?,
        };
        config.llm = config.llm.with_default_endpoint();
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
    }

    /// Pipeline tunables derived from this configuration.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            min_pdf_chars: self.extraction.min_pdf_chars,
            max_content_chars: self.llm.max_content_chars,
        }
    }
}

/// Resolve settings and configuration.
///
/// An explicit `config_path` must load; discovered configs that fail to
/// parse fall back to defaults. `DATABASE_PATH` overrides the database file.
pub async fn load_settings(config_path: Option<&Path>) -> Result<(Settings, Config), ConfigError> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let base_dir = config
        .base_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);

    if let Ok(path) = std::env::var("DATABASE_PATH") {
        if !path.trim().is_empty() {
            settings.database_path = Some(config.resolve_path(&path, &base_dir));
        }
    }

    Ok((settings, config))
}
