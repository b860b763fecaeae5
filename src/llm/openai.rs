use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{CompletionRequest, LlmClient, LlmClientError, endpoint};

/// Completion client for the OpenAI text-completions API (`/v1/completions`).
///
/// Any server exposing the same request/response shape can be targeted through the base URL.
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Create a client that authenticates with `api_key`.
    pub fn new(http: Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmClientError> {
        let url = endpoint(&self.base_url, "/v1/completions");
        let payload = json!({
            "model": request.model,
            "prompt": request.prompt,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                LlmClientError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LlmClientError::ProviderUnavailable(format!(
                "completion endpoint {url} returned 404"
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: CompletionResponse = response.json().await.map_err(|error| {
            LlmClientError::InvalidResponse(format!("failed to decode completion: {error}"))
        })?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| LlmClientError::InvalidResponse("completion had no choices".into()))
    }
}
