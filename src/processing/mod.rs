//! Document analysis pipeline: staging, extraction, chunking, and model orchestration.

pub mod analysis;
pub mod chunking;
mod service;
pub mod storage;
pub mod types;

pub use service::{AnalyzerApi, AnalyzerService, ServiceInitError};
pub use types::{
    AnalysisDimension, AnalysisError, AnalysisResult, AnalyzerError, ChunkingError, UploadedFile,
};
