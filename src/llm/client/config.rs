//! LLM client configuration.

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Mistral chat completions API (default)
    #[default]
    Mistral,
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mistral" => Some(Self::Mistral),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mistral => "mistral",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }

    /// Endpoint used when none is configured.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Mistral => "https://api.mistral.ai",
            Self::OpenAI => "https://api.openai.com",
            Self::Ollama => "http://localhost:11434",
        }
    }

    /// Whether requests need a bearer API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether document analysis is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// LLM provider (mistral, openai or ollama)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint. Empty means the provider's default endpoint.
    #[serde(default)]
    pub endpoint: String,
    /// API key for hosted providers. Never written back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model to use for analysis
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Maximum characters of document content to send to LLM
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_model() -> String {
    "mistral-small".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.1
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_max_content_chars() -> usize {
    48_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: LlmProvider::default().default_endpoint().to_string(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            max_content_chars: default_max_content_chars(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "mistral" (default), "openai", "groq", "together" or "ollama"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key for hosted providers
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    /// - `LLM_TIMEOUT_SECS`: Request timeout
    /// - `LLM_MAX_CONTENT_CHARS`: Max document chars to send
    ///
    /// LLM_PROVIDER wins over auto-detection from API keys. Without it,
    /// `MISTRAL_API_KEY` is preferred over `OPENAI_API_KEY`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        let explicit_provider = std::env::var("LLM_PROVIDER")
            .ok()
            .and_then(|v| LlmProvider::from_str(&v));
        if let Some(provider) = explicit_provider {
            self.provider = provider;
        }

        let explicit_endpoint = std::env::var("LLM_ENDPOINT").ok();

        if let Ok(val) = std::env::var("LLM_API_KEY") {
            self.api_key = Some(val);
        }

        match explicit_provider {
            Some(provider) => {
                if explicit_endpoint.is_none() {
                    self.endpoint = provider.default_endpoint().to_string();
                }
                if self.api_key.is_none() {
                    self.api_key = match provider {
                        LlmProvider::Mistral => std::env::var("MISTRAL_API_KEY").ok(),
                        LlmProvider::OpenAI => std::env::var("OPENAI_API_KEY").ok(),
                        LlmProvider::Ollama => None,
                    };
                }
            }
            None if self.api_key.is_none() => {
                if let Ok(key) = std::env::var("MISTRAL_API_KEY") {
                    self.api_key = Some(key);
                    self.provider = LlmProvider::Mistral;
                } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                    self.api_key = Some(key);
                    self.provider = LlmProvider::OpenAI;
                    if explicit_endpoint.is_none() {
                        self.endpoint = LlmProvider::OpenAI.default_endpoint().to_string();
                    }
                }
            }
            None => {}
        }

        if let Some(endpoint) = explicit_endpoint {
            self.endpoint = endpoint;
        }
        if let Ok(val) = std::env::var("LLM_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.max_tokens = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = t;
            }
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.request_timeout_secs = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_MAX_CONTENT_CHARS") {
            if let Ok(n) = val.parse() {
                self.max_content_chars = n;
            }
        }
        self.with_default_endpoint()
    }

    /// Fill in the provider's default endpoint when none is configured.
    pub fn with_default_endpoint(mut self) -> Self {
        if self.endpoint.trim().is_empty() {
            self.endpoint = self.provider.default_endpoint().to_string();
        }
        self
    }

    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Whether an API key is present for providers that need one.
    pub fn has_credentials(&self) -> bool {
        !self.provider.requires_api_key()
            || self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}
