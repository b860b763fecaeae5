use std::path::Path;

use super::ExtractionError;

/// Extract one text segment per page using `pdf-extract`.
pub(super) fn extract_pages(path: &Path) -> Result<Vec<String>, ExtractionError> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|error| ExtractionError::Pdf(error.to_string()))?;
    tracing::debug!(pages = pages.len(), "PDF text extraction complete");
    Ok(pages)
}
