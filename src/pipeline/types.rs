use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{DEFAULT_MAX_RELEVANT_CHUNKS, DEFAULT_MIN_SIMILARITY};
use crate::context::ContextConfig;

/// How ingestion reacts to embedding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestMode {
    /// Embedding failures abort ingestion.
    #[default]
    Normal,
    /// Embedding failures store zero vectors and flag the document.
    Degraded,
}

/// A registered source document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
    pub chunk_count: usize,
    pub ingested_at: DateTime<Utc>,
    /// Stored with placeholder vectors; retrieval relies on lexical signals only.
    pub degraded: bool,
}

impl Document {
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            word_count: self.word_count,
            char_count: self.char_count,
            chunk_count: self.chunk_count,
            ingested_at: self.ingested_at,
            degraded: self.degraded,
        }
    }
}

/// [`Document`] without its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub id: String,
    pub word_count: usize,
    pub char_count: usize,
    pub chunk_count: usize,
    pub ingested_at: DateTime<Utc>,
    pub degraded: bool,
}

/// Outcome of ingesting one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub chunk_count: usize,
    pub word_count: usize,
    pub char_count: usize,
    pub degraded: bool,
}

/// Per-request evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationOptions {
    pub max_relevant_chunks: usize,
    pub min_similarity_score: f32,
    /// Run the statement-level fact-check.
    pub fact_check: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            max_relevant_chunks: DEFAULT_MAX_RELEVANT_CHUNKS,
            min_similarity_score: DEFAULT_MIN_SIMILARITY,
            fact_check: false,
        }
    }
}

impl From<&ContextConfig> for EvaluationOptions {
    fn from(config: &ContextConfig) -> Self {
        Self {
            max_relevant_chunks: config.max_chunks,
            min_similarity_score: config.min_similarity,
            fact_check: false,
        }
    }
}

impl EvaluationOptions {
    pub fn max_relevant_chunks(mut self, max: usize) -> Self {
        self.max_relevant_chunks = max;
        self
    }

    pub fn min_similarity_score(mut self, min: f32) -> Self {
        self.min_similarity_score = min;
        self
    }

    pub fn fact_check(mut self, enabled: bool) -> Self {
        self.fact_check = enabled;
        self
    }
}
