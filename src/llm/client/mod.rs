//! LLM client for document analysis.
//!
//! Supports Mistral and other OpenAI-compatible chat completion APIs, plus
//! Ollama for local inference.

mod config;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use config::{LlmConfig, LlmProvider};

/// Errors that can occur while requesting an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Connection failure, timeout, non-2xx status, or a client that cannot send.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The service answered but carried no usable message content.
    #[error("Empty or invalid response from analysis service")]
    EmptyResponse,
}

/// Something that turns a prompt into the model's raw reply text.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn request(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// LLM client for document processing.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// Chat completion request format (Mistral, OpenAI, Groq, ...).
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: Option<String>,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn endpoint(&self) -> &str {
        match self.config.endpoint.trim_end_matches('/') {
            "" => self.config.provider.default_endpoint(),
            endpoint => endpoint,
        }
    }

    /// Check if the LLM service is reachable with the configured credentials.
    pub async fn is_available(&self) -> bool {
        if !self.config.enabled || !self.config.has_credentials() {
            return false;
        }
        match self.models_request().send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List available models.
    pub async fn list_models(&self) -> Result<Vec<String>, AnalysisError> {
        let resp = self
            .models_request()
            .send()
            .await
            .map_err(|e| AnalysisError::NetworkFailure(describe(&e)))?;

        if !resp.status().is_success() {
            return Err(AnalysisError::NetworkFailure(format!(
                "HTTP {}",
                resp.status()
            )));
        }

        #[derive(Deserialize)]
        struct TagsResponse {
            models: Vec<ModelInfo>,
        }

        #[derive(Deserialize)]
        struct ModelInfo {
            name: String,
        }

        #[derive(Deserialize)]
        struct ModelsResponse {
            data: Vec<ModelEntry>,
        }

        #[derive(Deserialize)]
        struct ModelEntry {
            id: String,
        }

        match self.config.provider {
            LlmProvider::Ollama => {
                let tags: TagsResponse =
                    resp.json().await.map_err(|_| AnalysisError::EmptyResponse)?;
                Ok(tags.models.into_iter().map(|m| m.name).collect())
            }
            LlmProvider::Mistral | LlmProvider::OpenAI => {
                let models: ModelsResponse =
                    resp.json().await.map_err(|_| AnalysisError::EmptyResponse)?;
                Ok(models.data.into_iter().map(|m| m.id).collect())
            }
        }
    }

    fn models_request(&self) -> reqwest::RequestBuilder {
        match self.config.provider {
            LlmProvider::Ollama => self.client.get(format!("{}/api/tags", self.endpoint())),
            LlmProvider::Mistral | LlmProvider::OpenAI => {
                let req = self.client.get(format!("{}/v1/models", self.endpoint()));
                match self.config.api_key.as_deref() {
                    Some(key) => req.bearer_auth(key),
                    None => req,
                }
            }
        }
    }

    /// Call an OpenAI-compatible chat completion endpoint.
    async fn call_chat(&self, prompt: &str) -> Result<String, AnalysisError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AnalysisError::NetworkFailure(format!(
                    "no API key configured for {}",
                    self.config.provider.as_str()
                ))
            })?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.endpoint());
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::NetworkFailure(describe(&e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::NetworkFailure(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = resp.json().await.map_err(|e| {
            debug!("Undecodable chat completion envelope: {}", e);
            AnalysisError::EmptyResponse
        })?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AnalysisError::EmptyResponse)
    }

    /// Call Ollama API with a prompt.
    async fn call_ollama(&self, prompt: &str) -> Result<String, AnalysisError> {
        let request = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.endpoint());
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::NetworkFailure(describe(&e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::NetworkFailure(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let ollama_resp: OllamaResponse = resp.json().await.map_err(|e| {
            debug!("Undecodable Ollama envelope: {}", e);
            AnalysisError::EmptyResponse
        })?;

        ollama_resp
            .response
            .filter(|r| !r.trim().is_empty())
            .ok_or(AnalysisError::EmptyResponse)
    }
}

#[async_trait]
impl AnalysisBackend for LlmClient {
    async fn request(&self, prompt: &str) -> Result<String, AnalysisError> {
        if !self.config.enabled {
            return Err(AnalysisError::NetworkFailure(
                "LLM analysis is disabled".to_string(),
            ));
        }

        info!(
            "Sending analysis request to {} ({})",
            self.config.provider.as_str(),
            self.config.model
        );
        let reply = match self.config.provider {
            LlmProvider::Ollama => self.call_ollama(prompt).await?,
            LlmProvider::Mistral | LlmProvider::OpenAI => self.call_chat(prompt).await?,
        };
        debug!("Received {} chars from analysis service", reply.len());
        Ok(reply)
    }
}

/// Describe a transport error, calling out timeouts.
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_client_is_network_failure() {
        let mut config = LlmConfig::base_default().with_api_key("k");
        config.enabled = false;
        let client = LlmClient::new(config);

        let err = client.request("prompt").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NetworkFailure(_)));
        assert!(!client.is_available().await);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_network_failure() {
        let client = LlmClient::new(LlmConfig::base_default());
        let err = client.request("prompt").await.unwrap_err();
        match err {
            AnalysisError::NetworkFailure(msg) => assert!(msg.contains("API key")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_failure() {
        let config = LlmConfig::base_default()
            .with_provider(LlmProvider::Ollama)
            .with_endpoint("http://127.0.0.1:9")
            .with_timeout_secs(2);
        let client = LlmClient::new(config);

        let err = client.request("prompt").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NetworkFailure(_)));
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "mistral-small",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.1,
            max_tokens: 2048,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "mistral-small");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 2048);
    }
}
