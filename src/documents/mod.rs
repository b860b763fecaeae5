//! Format selection and text extraction for uploaded documents.
//!
//! Each supported format maps to one extraction strategy that reads a file on disk and returns
//! its text as an ordered list of segments (pages for PDF, a single body for Word and plain text).
//! Selection is driven purely by the filename extension; content is never sniffed.

mod pdf;
mod text;
mod word;

use std::path::Path;
use thiserror::Error;

/// Errors raised while turning a stored upload into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Reading the stored file failed.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    /// The PDF parser rejected the document.
    #[error("failed to extract PDF text: {0}")]
    Pdf(String),
    /// The Word package could not be opened or lacks a document body.
    #[error("failed to extract Word text: {0}")]
    Word(String),
    /// A plain-text document was not valid UTF-8.
    #[error("document is not valid UTF-8 text")]
    Encoding,
}

/// Document formats the analyzer knows how to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing package (`.docx`, also attempted for `.doc`).
    Word,
    /// UTF-8 plain text.
    PlainText,
}

impl DocumentFormat {
    /// Resolve the format from the declared filename.
    ///
    /// The extension is the substring after the last `.`, compared case-insensitively. Returns
    /// `None` for unknown extensions and for names without a dot.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" => Some(Self::Word),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Canonical extension used when naming scratch files for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "docx",
            Self::PlainText => "txt",
        }
    }

    /// Run the extraction strategy for this format against a file on disk.
    ///
    /// This is blocking; async callers should run it on the blocking pool.
    pub fn load(self, path: &Path) -> Result<ExtractedDocument, ExtractionError> {
        let segments = match self {
            Self::Pdf => pdf::extract_pages(path)?,
            Self::Word => vec![word::extract_body(path)?],
            Self::PlainText => vec![text::read_utf8(path)?],
        };
        Ok(ExtractedDocument { segments })
    }
}

/// Ordered text segments produced by an extraction strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Page or body texts in document order.
    pub segments: Vec<String>,
}

impl ExtractedDocument {
    /// Concatenate all segments into one blob, separated by a single space.
    pub fn text(&self) -> String {
        self.segments.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn selects_format_by_lowercased_extension() {
        assert_eq!(
            DocumentFormat::from_filename("report.PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_filename("notes.docx"),
            Some(DocumentFormat::Word)
        );
        assert_eq!(
            DocumentFormat::from_filename("legacy.Doc"),
            Some(DocumentFormat::Word)
        );
        assert_eq!(
            DocumentFormat::from_filename("archive.tar.txt"),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn rejects_unknown_or_missing_extensions() {
        for name in ["test.xyz", "README", "", "trailing.", "pdf", "file.pdfx", "file.txt.bak"] {
            assert_eq!(DocumentFormat::from_filename(name), None, "{name}");
        }
    }

    #[test]
    fn plain_text_loader_returns_single_segment() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "This is a test document.").expect("write");

        let document = DocumentFormat::PlainText
            .load(file.path())
            .expect("plain text loads");
        assert_eq!(document.segments, vec!["This is a test document.".to_string()]);
    }

    #[test]
    fn plain_text_loader_rejects_invalid_utf8() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&[0xff, 0xfe, 0x00, 0xc3]).expect("write");

        let error = DocumentFormat::PlainText.load(file.path()).unwrap_err();
        assert!(matches!(error, ExtractionError::Encoding));
    }

    #[test]
    fn word_loader_rejects_non_zip_payloads() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"\xd0\xcf\x11\xe0 legacy binary doc").expect("write");

        let error = DocumentFormat::Word.load(file.path()).unwrap_err();
        assert!(matches!(error, ExtractionError::Word(_)));
    }

    #[test]
    fn pdf_loader_rejects_garbage() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"not a pdf at all").expect("write");

        assert!(DocumentFormat::Pdf.load(file.path()).is_err());
    }

    /// Assemble a minimal two-page PDF with one Helvetica text run per page.
    fn two_page_pdf(first: &str, second: &str) -> Vec<u8> {
        let content = |text: &str| {
            let stream = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
            format!(
                "<< /Length {} >>\nstream\n{stream}\nendstream",
                stream.len()
            )
        };
        let page = |contents: u32| {
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 7 0 R >> >> /Contents {contents} 0 R >>"
            )
        };
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R 5 0 R] /Count 2 >>".to_string(),
            page(4),
            content(first),
            page(6),
            content(second),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
        }

        let xref_start = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[test]
    fn pdf_loader_returns_one_segment_per_page() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&two_page_pdf("Quarterly revenue", "Closing remarks"))
            .expect("write");

        let document = DocumentFormat::Pdf.load(file.path()).expect("pdf loads");

        assert_eq!(document.segments.len(), 2);
        assert!(document.segments[0].contains("Quarterly revenue"));
        assert!(document.segments[1].contains("Closing remarks"));
        assert!(!document.segments[0].contains("Closing remarks"));
        let text = document.text();
        assert_eq!(text, document.segments.join(" "));
        let first = text.find("Quarterly revenue").expect("first page text");
        let second = text.find("Closing remarks").expect("second page text");
        assert!(first < second);
    }

    #[test]
    fn segments_join_with_single_space() {
        let document = ExtractedDocument {
            segments: vec!["page one".into(), "page two".into()],
        };
        assert_eq!(document.text(), "page one page two");
    }
}
