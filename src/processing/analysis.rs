//! Prompting the language model for the four analysis dimensions.
//!
//! Each dimension is one fixed template with the text substituted as its only variable. The four
//! calls share no data, so they run concurrently; the join is fail-fast and the first error
//! cancels the remaining calls. Model output is not validated: whatever text comes back is
//! trimmed and, for list-shaped dimensions, split into lines.

use crate::llm::{CompletionRequest, LlmClient};

use super::types::{AnalysisDimension, AnalysisError, AnalysisResult};

/// Render the prompt for one dimension.
pub fn render_prompt(dimension: AnalysisDimension, text: &str) -> String {
    let instruction = match dimension {
        AnalysisDimension::Summary => "Summarize the following text in a concise way:",
        AnalysisDimension::KeyPoints => "Extract the key points from the following text:",
        AnalysisDimension::Sentiment => {
            "Analyze the sentiment of the following text (positive, negative, or neutral):"
        }
        AnalysisDimension::Topics => "Identify the main topics discussed in the following text:",
    };
    format!("{instruction}\n{text}\n")
}

/// Issues the analysis prompts against a completion backend.
pub struct DocumentAnalyzer {
    client: Box<dyn LlmClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl DocumentAnalyzer {
    /// Wrap a completion client with the sampling settings used for every prompt.
    pub fn new(client: Box<dyn LlmClient>, model: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            client,
            model,
            temperature,
            max_tokens,
        }
    }

    /// Run all four dimensions against `text` and assemble the result.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let (summary, key_points, sentiment, topics) = tokio::try_join!(
            self.run(AnalysisDimension::Summary, text),
            self.run(AnalysisDimension::KeyPoints, text),
            self.run(AnalysisDimension::Sentiment, text),
            self.run(AnalysisDimension::Topics, text),
        )?;

        Ok(AnalysisResult {
            summary: summary.trim().to_string(),
            key_points: split_lines(&key_points),
            sentiment: sentiment.trim().to_string(),
            topics: split_lines(&topics),
        })
    }

    async fn run(&self, dimension: AnalysisDimension, text: &str) -> Result<String, AnalysisError> {
        let request = CompletionRequest {
            prompt: render_prompt(dimension, text),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let output = self
            .client
            .complete(request)
            .await
            .map_err(|source| AnalysisError { dimension, source })?;
        tracing::debug!(%dimension, chars = output.len(), "Model call completed");
        Ok(output)
    }
}

/// Split list-shaped model output into trimmed, non-blank lines.
fn split_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
