#![deny(missing_docs)]

//! Core library for the Smart Document Analyzer service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Format selection and text extraction.
pub mod documents;
/// Language model client abstraction and adapters.
pub mod llm;
/// Structured logging and tracing setup.
pub mod logging;
/// Document analysis pipeline.
pub mod processing;
