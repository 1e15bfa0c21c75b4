//! Context assembly: transcript in, ranked supporting passages out.

mod error;


pub use error::{ContextError, ContextResult};

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::constants::{DEFAULT_MAX_RELEVANT_CHUNKS, DEFAULT_MIN_SIMILARITY};
use crate::embedding::EmbeddingClient;
use crate::vectordb::{RetrievalResult, VectorIndex};

/// Separator between chunk texts in [`ContextBundle::combined_text`].
pub const CONTEXT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextConfig {
    pub max_chunks: usize,
    /// Candidates scoring below this are dropped.
    pub min_similarity: f32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_chunks: DEFAULT_MAX_RELEVANT_CHUNKS,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

/// Ranked passages retrieved for one transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ContextBundle {
    pub chunks: Vec<RetrievalResult>,
    pub combined_text: String,
    /// Sum of the surviving chunk scores.
    pub total_score: f32,
}

impl ContextBundle {
    fn from_results(chunks: Vec<RetrievalResult>) -> Self {
        let combined_text = chunks
            .iter()
            .map(RetrievalResult::text)
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        let total_score = chunks.iter().map(|c| c.score).sum();
        Self {
            chunks,
            combined_text,
            total_score,
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn best_score(&self) -> f32 {
        self.chunks.first().map(|c| c.score).unwrap_or(0.0)
    }
}

/// Embeds a transcript and pulls the best-matching chunks of one document.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    embedder: Arc<EmbeddingClient>,
    index: Arc<VectorIndex>,
    config: ContextConfig,
}

impl ContextAssembler {
    pub fn new(embedder: Arc<EmbeddingClient>, index: Arc<VectorIndex>, config: ContextConfig) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Retrieves up to `max_chunks` passages using the configured floor.
    pub async fn get_relevant_context(
        &self,
        transcript: &str,
        document_id: &str,
        max_chunks: usize,
    ) -> ContextResult<ContextBundle> {
        self.retrieve(transcript, document_id, max_chunks, self.config.min_similarity)
            .await
    }

    #[instrument(skip(self, transcript), fields(document_id = document_id, transcript_len = transcript.len()))]
    pub async fn retrieve(
        &self,
        transcript: &str,
        document_id: &str,
        max_chunks: usize,
        min_similarity: f32,
    ) -> ContextResult<ContextBundle> {
        if self.index.count(Some(document_id)) == 0 {
            return Err(ContextError::NoContextFound {
                document_id: document_id.to_string(),
            });
        }

        let vector = self.embedder.embed_query(transcript).await?;
        let lexical = transcript.to_lowercase();
        let candidates = self
            .index
            .query(&vector, &lexical, max_chunks, Some(document_id));

        let best_score = candidates.first().map(|c| c.score).unwrap_or(0.0);
        let kept: Vec<RetrievalResult> = candidates
            .into_iter()
            .filter(|c| c.score >= min_similarity)
            .collect();

        debug!(
            best_score,
            kept = kept.len(),
            min_similarity,
            "Candidates filtered"
        );

        if kept.is_empty() {
            return Err(ContextError::NoRelevantContext {
                best_score,
                threshold: min_similarity,
            });
        }

        let bundle = ContextBundle::from_results(kept);
        info!(
            chunks = bundle.len(),
            total_score = bundle.total_score,
            "Context assembled"
        );
        Ok(bundle)
    }
}
