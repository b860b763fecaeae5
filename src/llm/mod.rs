//! Abstractions over hosted text-completion providers.
//!
//! The analyzer talks to language models through [`LlmClient`], a single-prompt, single-response
//! interface. Adapters issue HTTP requests directly with `reqwest`; there is no retry layer and
//! no streaming, so a call either yields the full completion text or an error.

mod ollama;
mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use crate::config::{Config, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Errors surfaced while requesting a completion.
#[derive(Debug, Error)]
pub enum LlmClientError {
    /// Provider could not be reached or the endpoint does not exist.
    #[error("Language model provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Language model request failed: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Single prompt submitted to a provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Fully rendered prompt text.
    pub prompt: String,
    /// Model identifier understood by the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

/// Interface implemented by completion backends.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for the supplied prompt.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmClientError>;
}

/// Build the completion client selected by configuration.
pub fn build_llm_client(config: &Config) -> Result<Box<dyn LlmClient>, LlmClientError> {
    let http = http_client(config)?;
    let client: Box<dyn LlmClient> = match config.llm_provider {
        LlmProvider::OpenAI => Box::new(OpenAiClient::new(
            http,
            config.llm_base_url.clone(),
            config.llm_api_key.clone().unwrap_or_default(),
        )),
        LlmProvider::Ollama => Box::new(OllamaClient::new(http, config.llm_base_url.clone())),
    };
    Ok(client)
}

fn http_client(config: &Config) -> Result<Client, LlmClientError> {
    let mut builder = Client::builder().user_agent(concat!("smartdoc/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = config.llm_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|error| {
        LlmClientError::ProviderUnavailable(format!("failed to construct HTTP client: {error}"))
    })
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}
