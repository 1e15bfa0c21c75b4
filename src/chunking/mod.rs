//! Document chunking.
//!
//! Text is normalized with [`normalize_text`], cut into units by the configured
//! [`ChunkStrategy`], packed greedily up to `chunk_size` characters and finally
//! prefixed with the trailing `overlap` characters of the previous chunk.
//!
//! Chunk bodies (text minus the overlap prefix) partition the normalized text, so
//! [`reconstruct`] returns it byte for byte.

pub mod config;
pub mod error;
pub mod normalize;
mod splitter;

#[cfg(test)]
mod tests;

pub use config::{ChunkStrategy, ChunkerConfig};
pub use error::ChunkingError;
pub use normalize::{char_count, normalize_text, word_count};

use serde::Serialize;
use tracing::debug;

const MAX_HEADING_CHARS: usize = 120;
const MAX_HEADING_WORDS: usize = 12;

/// Metadata derived from a chunk body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkMetadata {
    pub word_count: usize,
    pub char_count: usize,
    /// Heading line detected at the start of the body, if any.
    pub section: Option<String>,
}

/// One contiguous slice of a normalized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub index: usize,
    /// Overlap prefix followed by the body.
    pub text: String,
    /// Byte length of the overlap prefix inside `text`.
    pub overlap_len: usize,
    /// Byte offset of the body in the normalized text.
    pub start: usize,
    /// Byte offset one past the body in the normalized text.
    pub end: usize,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// The chunk text without the overlap prefix.
    pub fn body(&self) -> &str {
        &self.text[self.overlap_len..]
    }

    /// The repeated tail of the previous chunk.
    pub fn overlap_prefix(&self) -> &str {
        &self.text[..self.overlap_len]
    }
}

/// Splits documents into overlapping chunks.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Result<Self, ChunkingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunks `text` with the configured size, overlap and strategy.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        build_chunks(
            &normalize_text(text),
            self.config.chunk_size,
            self.config.overlap,
            self.config.strategy,
        )
    }

    /// Convenience wrapper returning only chunk texts.
    pub fn chunk_texts(&self, text: &str) -> Vec<String> {
        self.chunk(text).into_iter().map(|c| c.text).collect()
    }
}

/// Chunks `text` with explicit parameters.
///
/// Returns an empty list for empty or whitespace-only input.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
    strategy: ChunkStrategy,
) -> Result<Vec<Chunk>, ChunkingError> {
    let chunker = Chunker::new(ChunkerConfig::new(chunk_size, overlap, strategy))?;
    Ok(chunker.chunk(text))
}

/// Concatenates chunk bodies, dropping overlap prefixes.
pub fn reconstruct(chunks: &[Chunk]) -> String {
    chunks.iter().map(Chunk::body).collect()
}

fn build_chunks(
    normalized: &str,
    chunk_size: usize,
    overlap: usize,
    strategy: ChunkStrategy,
) -> Vec<Chunk> {
    let spans = splitter::split_spans(normalized, strategy, chunk_size);
    let mut chunks: Vec<Chunk> = Vec::with_capacity(spans.len());

    for span in spans {
        let prefix_start = match chunks.last() {
            Some(previous) if overlap > 0 => {
                let previous_text_start = previous.start - previous.overlap_len;
                overlap_start(normalized, previous_text_start, span.start, overlap)
            }
            _ => span.start,
        };

        let body = &normalized[span.clone()];
        let metadata = ChunkMetadata {
            word_count: word_count(body),
            char_count: char_count(body),
            section: detect_section(body),
        };

        chunks.push(Chunk {
            index: chunks.len(),
            text: normalized[prefix_start..span.end].to_string(),
            overlap_len: span.start - prefix_start,
            start: span.start,
            end: span.end,
            metadata,
        });
    }

    debug!(
        chunks = chunks.len(),
        chunk_size,
        overlap,
        strategy = %strategy,
        "Document chunked"
    );

    chunks
}

/// Byte offset where the last `overlap` characters before `body_start` begin,
/// never reaching further back than `window_start`.
fn overlap_start(text: &str, window_start: usize, body_start: usize, overlap: usize) -> usize {
    let window = &text[window_start..body_start];
    let skip = window.chars().count().saturating_sub(overlap);
    window_start
        + window
            .char_indices()
            .nth(skip)
            .map(|(offset, _)| offset)
            .unwrap_or(window.len())
}

fn detect_section(body: &str) -> Option<String> {
    let (first, rest) = body.split_once('\n')?;
    let first = first.trim();
    if first.is_empty() || rest.trim().is_empty() {
        return None;
    }

    if first.starts_with('#') {
        let heading = first.trim_start_matches('#').trim();
        return (!heading.is_empty()).then(|| truncate_heading(heading));
    }

    let alphabetic = first.chars().filter(|c| c.is_alphabetic()).count();
    if alphabetic < 3
        || first.chars().count() > MAX_HEADING_CHARS
        || first.split_whitespace().count() > MAX_HEADING_WORDS
        || first.ends_with(['.', '!', '?', ',', ';'])
    {
        return None;
    }

    let opens = first
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
    opens.then(|| truncate_heading(first.trim_end_matches(':')))
}

fn truncate_heading(heading: &str) -> String {
    heading.chars().take(MAX_HEADING_CHARS).collect()
}
