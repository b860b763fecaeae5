//! Analyzer service coordinating storage, extraction, chunking, and model calls.

use crate::{
    config::Config,
    documents::{DocumentFormat, ExtractedDocument},
    llm::{LlmClient, LlmClientError, build_llm_client},
    processing::{
        analysis::DocumentAnalyzer,
        chunking::TextChunker,
        storage::ScratchFile,
        types::{AnalysisResult, AnalyzerError, ChunkingError, UploadedFile},
    },
};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while wiring the service at startup.
#[derive(Debug, Error)]
pub enum ServiceInitError {
    /// Configured chunk budget is unusable.
    #[error("invalid chunking configuration: {0}")]
    Chunking(#[from] ChunkingError),
    /// Completion client could not be constructed.
    #[error("failed to build language model client: {0}")]
    Llm(#[from] LlmClientError),
}

/// Runs the full pipeline for one upload: stage, extract, chunk, analyze.
///
/// The service holds only immutable settings and the completion client; every request gets its
/// own scratch file and no state is shared between requests. Construct it once at startup and
/// share it through an `Arc`.
pub struct AnalyzerService {
    config: Arc<Config>,
    chunker: TextChunker,
    analyzer: DocumentAnalyzer,
}

/// Abstraction over the analysis pipeline used by the HTTP surface.
#[async_trait]
pub trait AnalyzerApi: Send + Sync {
    /// Analyze one uploaded document.
    async fn analyze_document(
        &self,
        upload: UploadedFile,
    ) -> Result<AnalysisResult, AnalyzerError>;
}

impl AnalyzerService {
    /// Build the service with the completion client selected by configuration.
    pub fn new(config: Arc<Config>) -> Result<Self, ServiceInitError> {
        let client = build_llm_client(&config)?;
        tracing::info!(
            provider = ?config.llm_provider,
            model = %config.llm_model,
            "Language model client initialized"
        );
        Self::with_client(config, client)
    }

    /// Build the service around an explicit completion client.
    pub fn with_client(
        config: Arc<Config>,
        client: Box<dyn LlmClient>,
    ) -> Result<Self, ServiceInitError> {
        let chunker = TextChunker::new(config.chunk_size, config.chunk_overlap)?;
        let analyzer = DocumentAnalyzer::new(
            client,
            config.llm_model.clone(),
            config.llm_temperature,
            config.llm_max_tokens,
        );
        Ok(Self {
            config,
            chunker,
            analyzer,
        })
    }

    /// Stage, extract, chunk, and analyze an upload.
    ///
    /// Only the first chunk reaches the model. A document with no extractable text is analyzed as
    /// an empty string.
    pub async fn analyze_document(
        &self,
        upload: UploadedFile,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let UploadedFile { filename, bytes } = upload;
        let format = DocumentFormat::from_filename(&filename).ok_or_else(|| {
            let extension = filename
                .rsplit_once('.')
                .map(|(_, extension)| extension.to_lowercase())
                .unwrap_or_default();
            AnalyzerError::UnsupportedFormat(extension)
        })?;
        tracing::info!(?format, bytes = bytes.len(), "Extracting document");

        let prepared = self.prepare(format, bytes).await?;
        tracing::info!(
            segments = prepared.segments,
            chars = prepared.chars,
            chunks = prepared.chunks,
            chunk_size = self.chunker.chunk_size(),
            "Document extracted and chunked"
        );

        let result = self.analyzer.analyze(&prepared.first_chunk).await?;
        tracing::info!(
            key_points = result.key_points.len(),
            topics = result.topics.len(),
            "Document analyzed"
        );
        Ok(result)
    }

    /// Stage, extract, and chunk the upload on the blocking pool.
    ///
    /// The scratch file lives inside the blocking task and is removed when it finishes, whether
    /// extraction succeeded, failed, or panicked. Every chunk is computed, but only the first
    /// leaves the task.
    async fn prepare(
        &self,
        format: DocumentFormat,
        bytes: Vec<u8>,
    ) -> Result<PreparedText, AnalyzerError> {
        let scratch_dir: PathBuf = self.config.scratch_dir.clone();
        let chunker = self.chunker;
        tokio::task::spawn_blocking(move || -> Result<PreparedText, AnalyzerError> {
            let document = {
                let scratch = ScratchFile::persist(&scratch_dir, format, &bytes)
                    .map_err(AnalyzerError::Storage)?;
                format.load(scratch.path())?
            };
            Ok(PreparedText::from_document(&document, &chunker))
        })
        .await
        .map_err(|error| AnalyzerError::Task(error.to_string()))?
    }
}

/// Extraction summary handed back from the blocking pool.
struct PreparedText {
    segments: usize,
    chars: usize,
    chunks: usize,
    first_chunk: String,
}

impl PreparedText {
    fn from_document(document: &ExtractedDocument, chunker: &TextChunker) -> Self {
        let text = document.text();
        let chunks = chunker.split(&text);
        Self {
            segments: document.segments.len(),
            chars: text.chars().count(),
            chunks: chunks.len(),
            first_chunk: chunks.into_iter().next().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl AnalyzerApi for AnalyzerService {
    async fn analyze_document(
        &self,
        upload: UploadedFile,
    ) -> Result<AnalysisResult, AnalyzerError> {
        AnalyzerService::analyze_document(self, upload).await
    }
}
