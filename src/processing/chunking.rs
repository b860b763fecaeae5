//! Character-budgeted semantic chunking.
//!
//! Boundaries come from `semchunk-rs`, which prefers the largest structural break available
//! (blank lines, then newlines, then other whitespace and punctuation) and only cuts inside a word
//! when a single word exceeds the budget. The counter handed to it measures `char`s, never bytes,
//! so multi-byte text is sized the way a reader would count it.
//!
//! Each chunk after the first is prefixed with up to `overlap` characters from the end of its
//! predecessor so that text around a boundary stays visible. Overlapped chunks still respect
//! `chunk_size`.

use semchunk_rs::Chunker;

use super::types::ChunkingError;

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap between neighbouring windows in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Splits text into bounded, overlapping chunks.
///
/// Splitting is a pure function of the input and the two size parameters.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextChunker {
    /// Build a chunker, rejecting budgets that could never advance.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkingError> {
        if chunk_size == 0 {
            return Err(ChunkingError::InvalidChunkSize);
        }
        if overlap >= chunk_size {
            return Err(ChunkingError::OverlapTooLarge {
                chunk_size,
                overlap,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Maximum characters per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split `text` into trimmed, non-empty chunks.
    ///
    /// Returns an empty vector when the input is empty or all whitespace. Input shorter than the
    /// chunk size yields exactly one chunk. This is CPU-bound on large inputs; async callers
    /// should run it on the blocking pool.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chunker = Chunker::new(self.chunk_size, Box::new(char_len));
        let base_chunks: Vec<String> = chunker
            .chunk(text)
            .into_iter()
            .filter_map(|chunk| {
                let trimmed = chunk.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect();

        apply_overlap(base_chunks, self.chunk_size, self.overlap)
    }
}

/// Prefix each chunk with the tail of its predecessor, never exceeding `chunk_size`.
///
/// The tail is measured against the original predecessor, not its overlapped form, so overlap
/// never compounds across chunks.
fn apply_overlap(chunks: Vec<String>, chunk_size: usize, overlap: usize) -> Vec<String> {
    if overlap == 0 || chunks.len() < 2 {
        return chunks;
    }

    let mut overlapped = Vec::with_capacity(chunks.len());
    let mut previous: Option<String> = None;

    for current in chunks {
        let chunk = match previous.as_deref() {
            Some(previous) => build_overlapped_chunk(previous, &current, overlap, chunk_size),
            None => current.clone(),
        };
        overlapped.push(chunk);
        previous = Some(current);
    }

    overlapped
}

fn build_overlapped_chunk(
    previous: &str,
    current: &str,
    overlap: usize,
    chunk_size: usize,
) -> String {
    // One character is reserved for the joining space.
    let room = chunk_size.saturating_sub(char_len(current) + 1);
    let tail = tail_with_char_limit(previous, overlap.min(room));
    if tail.is_empty() {
        return current.to_string();
    }

    let mut combined = String::with_capacity(tail.len() + current.len() + 1);
    combined.push_str(tail);
    if !ends_with_whitespace(tail) {
        combined.push(' ');
    }
    combined.push_str(current);
    combined
}

/// Return at most the last `limit` characters of `text`, with leading whitespace removed.
fn tail_with_char_limit(text: &str, limit: usize) -> &str {
    if limit == 0 {
        return "";
    }

    let start = text
        .char_indices()
        .rev()
        .nth(limit - 1)
        .map(|(offset, _)| offset)
        .unwrap_or(0);
    text[start..].trim_start()
}

fn ends_with_whitespace(text: &str) -> bool {
    text.chars()
        .next_back()
        .map(|c| c.is_whitespace())
        .unwrap_or(false)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
