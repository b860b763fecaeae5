//! Core data types and error definitions for the analysis pipeline.

use crate::documents::ExtractionError;
use crate::llm::LlmClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced while splitting text into chunks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkingError {
    /// Chunker configured with an impossible size budget.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
    /// Overlap would prevent the window from advancing.
    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({chunk_size})")]
    OverlapTooLarge {
        /// Requested chunk size in characters.
        chunk_size: usize,
        /// Requested overlap in characters.
        overlap: usize,
    },
}

/// The four outputs requested from the language model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisDimension {
    /// Concise prose summary.
    Summary,
    /// Bullet-style key points.
    KeyPoints,
    /// Free-form sentiment label.
    Sentiment,
    /// Main topics discussed.
    Topics,
}

impl AnalysisDimension {
    /// Stable lowercase name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::KeyPoints => "key_points",
            Self::Sentiment => "sentiment",
            Self::Topics => "topics",
        }
    }
}

impl fmt::Display for AnalysisDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model call for one dimension failed, aborting the whole analysis.
#[derive(Debug, Error)]
#[error("{dimension} analysis failed: {source}")]
pub struct AnalysisError {
    /// Dimension whose call failed first.
    pub dimension: AnalysisDimension,
    /// Underlying provider error.
    #[source]
    pub source: LlmClientError,
}

/// Errors emitted by the document analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The filename extension is not one of `pdf`, `docx`, `doc`, `txt`.
    #[error("Unsupported file format")]
    UnsupportedFormat(String),
    /// The format loader could not parse the stored upload.
    #[error("Failed to extract document text: {0}")]
    Extraction(#[source] ExtractionError),
    /// Chunking step rejected the document.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// A model call failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    /// Scratch storage could not be written or read back.
    #[error("Scratch storage failed: {0}")]
    Storage(#[source] std::io::Error),
    /// The blocking extraction task did not complete.
    #[error("Document extraction task failed: {0}")]
    Task(String),
}

impl From<ExtractionError> for AnalyzerError {
    fn from(error: ExtractionError) -> Self {
        match error {
            ExtractionError::Io(io) => Self::Storage(io),
            other => Self::Extraction(other),
        }
    }
}

/// Raw upload as received by the HTTP layer; lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename declared by the client. Used only to select the format.
    pub filename: String,
    /// Uploaded bytes.
    pub bytes: Vec<u8>,
}

/// Structured analysis returned for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Concise summary of the analyzed text.
    pub summary: String,
    /// Key points, one per non-blank line of the model output.
    pub key_points: Vec<String>,
    /// Sentiment as phrased by the model.
    pub sentiment: String,
    /// Main topics, one per non-blank line of the model output.
    pub topics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_message_is_stable() {
        let error = AnalyzerError::UnsupportedFormat("xyz".into());
        assert_eq!(error.to_string(), "Unsupported file format");
    }

    #[test]
    fn analysis_error_names_dimension() {
        let error = AnalyzerError::from(AnalysisError {
            dimension: AnalysisDimension::Sentiment,
            source: LlmClientError::GenerationFailed("provider returned 500".into()),
        });
        let message = error.to_string();
        assert!(message.starts_with("sentiment analysis failed"));
        assert!(message.contains("500"));
    }

    #[test]
    fn scratch_read_failures_are_storage_errors() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "scratch file vanished");
        let error = AnalyzerError::from(ExtractionError::Io(missing));
        assert!(matches!(error, AnalyzerError::Storage(_)));
        assert!(error.to_string().starts_with("Scratch storage failed"));

        let parse = AnalyzerError::from(ExtractionError::Encoding);
        assert!(matches!(parse, AnalyzerError::Extraction(ExtractionError::Encoding)));
    }

    #[test]
    fn result_serializes_exactly_four_keys() {
        let value = serde_json::to_value(AnalysisResult::default()).expect("json");
        let mut keys: Vec<_> = value.as_object().expect("object").keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["key_points", "sentiment", "summary", "topics"]);
    }
}
