use serde::{Deserialize, Serialize};

use super::error::ChunkingError;
use crate::constants::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

/// How the normalized text is cut into units before packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkStrategy {
    /// Blank-line separated paragraphs; oversized paragraphs fall back to sentences.
    #[default]
    ByParagraph,
    /// Sentences; oversized sentences fall back to words.
    BySentence,
    /// Whole words packed greedily.
    ByWordCount,
}

impl ChunkStrategy {
    /// The strategy an oversized unit is re-split with, if any.
    pub fn finer(self) -> Option<Self> {
        match self {
            Self::ByParagraph => Some(Self::BySentence),
            Self::BySentence => Some(Self::ByWordCount),
            Self::ByWordCount => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByParagraph => "by-paragraph",
            Self::BySentence => "by-sentence",
            Self::ByWordCount => "by-word-count",
        }
    }
}

impl std::fmt::Display for ChunkStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChunkStrategy {
    type Err = ChunkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paragraph" | "by-paragraph" | "by_paragraph" => Ok(Self::ByParagraph),
            "sentence" | "by-sentence" | "by_sentence" => Ok(Self::BySentence),
            "word" | "words" | "by-word-count" | "by_word_count" => Ok(Self::ByWordCount),
            other => Err(ChunkingError::UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for [`Chunker`](super::Chunker). Sizes are in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Upper bound on a chunk body (excluding the overlap prefix).
    pub chunk_size: usize,
    /// Characters of the previous chunk repeated at the start of the next.
    pub overlap: usize,
    pub strategy: ChunkStrategy,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            strategy: ChunkStrategy::default(),
        }
    }
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, overlap: usize, strategy: ChunkStrategy) -> Self {
        Self {
            chunk_size,
            overlap,
            strategy,
        }
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn strategy(mut self, strategy: ChunkStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), ChunkingError> {
        if self.chunk_size == 0 {
            return Err(ChunkingError::InvalidConfig {
                reason: "chunk_size must be > 0".to_string(),
            });
        }
        if self.overlap >= self.chunk_size {
            return Err(ChunkingError::InvalidConfig {
                reason: format!(
                    "overlap ({}) must be smaller than chunk_size ({})",
                    self.overlap, self.chunk_size
                ),
            });
        }
        Ok(())
    }
}
