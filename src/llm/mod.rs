//! Language model integration: prompt construction, the HTTP client, and
//! parsing of model replies.

pub mod client;
pub mod parser;
pub mod prompts;

pub use client::{AnalysisBackend, AnalysisError, LlmClient, LlmConfig, LlmProvider};
pub use parser::{parse, ParseError};
pub use prompts::{build_prompt, AnalysisRequest, PromptBuilder, PromptError};
