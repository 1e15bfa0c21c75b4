use std::sync::Arc;

use serde::Serialize;

use crate::chunking::Chunk;
use crate::hashing::chunk_id;

/// Per-record metadata carried alongside the vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMetadata {
    pub document_id: String,
    pub chunk_id: String,
    pub chunk_index: usize,
    pub section: Option<String>,
    /// Set when the vector is a zero placeholder from degraded ingestion.
    pub degraded: bool,
}

/// One indexed chunk.
#[derive(Debug, Clone, Serialize)]
pub struct VectorRecord {
    #[serde(skip_serializing)]
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    pub fn new(
        document_id: impl Into<String>,
        chunk_index: usize,
        text: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        let document_id = document_id.into();
        Self {
            vector,
            text: text.into(),
            metadata: RecordMetadata {
                chunk_id: chunk_id(&document_id, chunk_index),
                document_id,
                chunk_index,
                section: None,
                degraded: false,
            },
        }
    }

    /// Builds the record for a chunk produced by the chunker.
    pub fn from_chunk(document_id: &str, chunk: &Chunk, vector: Vec<f32>) -> Self {
        Self::new(document_id, chunk.index, chunk.text.clone(), vector)
            .with_section(chunk.metadata.section.clone())
    }

    pub fn with_section(mut self, section: Option<String>) -> Self {
        self.metadata.section = section;
        self
    }

    pub fn with_degraded(mut self, degraded: bool) -> Self {
        self.metadata.degraded = degraded;
        self
    }

    pub fn chunk_id(&self) -> &str {
        &self.metadata.chunk_id
    }

    pub fn document_id(&self) -> &str {
        &self.metadata.document_id
    }
}

/// Component scores behind a hybrid score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub cosine: f32,
    pub jaccard: f32,
    pub semantic: f32,
}

/// A record with its hybrid score for one query.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    pub record: Arc<VectorRecord>,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

impl RetrievalResult {
    pub fn text(&self) -> &str {
        &self.record.text
    }

    pub fn chunk_index(&self) -> usize {
        self.record.metadata.chunk_index
    }
}
