//! Word extraction for Office Open XML packages.
//!
//! A `.docx` file is a ZIP archive whose body lives in `word/document.xml`. Visible text sits in
//! `<w:t>` runs; paragraphs close with `</w:p>`. We walk the tags directly rather than building a
//! DOM, since only runs, tabs, breaks and paragraph ends matter for plain-text output.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

use super::ExtractionError;

const BODY_PART: &str = "word/document.xml";

pub(super) fn extract_body(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|error| ExtractionError::Word(format!("not a Word package: {error}")))?;
    let mut part = archive
        .by_name(BODY_PART)
        .map_err(|_| ExtractionError::Word(format!("{BODY_PART} not found")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(document_xml_text(&xml))
}

/// Flatten WordprocessingML markup into plain text.
fn document_xml_text(xml: &str) -> String {
    let mut output = String::with_capacity(xml.len() / 4);
    let mut rest = xml;
    let mut in_run_text = false;

    while let Some(open) = rest.find('<') {
        if in_run_text {
            output.push_str(&decode_entities(&rest[..open]));
        }
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('>') else {
            break;
        };
        let tag = &after_open[..close];

        if let Some(closing) = tag.strip_prefix('/') {
            match closing.trim() {
                "w:t" => in_run_text = false,
                "w:p" => output.push('\n'),
                _ => {}
            }
        } else {
            let name = tag
                .split(|c: char| c.is_whitespace() || c == '/')
                .next()
                .unwrap_or_default();
            match name {
                "w:t" => in_run_text = !tag.ends_with('/'),
                "w:tab" => output.push('\t'),
                "w:br" | "w:cr" => output.push('\n'),
                _ => {}
            }
        }

        rest = &after_open[close + 1..];
    }

    output.trim_end().to_string()
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
