use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
/// Errors returned while assembling context for a transcript.
pub enum ContextError {
    /// The document has no indexed chunks.
    #[error("no indexed chunks for document '{document_id}'")]
    NoContextFound {
        /// Requested document.
        document_id: String,
    },

    /// Every candidate scored below the similarity floor.
    #[error("no chunk reached the similarity floor {threshold:.2} (best {best_score:.3})")]
    NoRelevantContext {
        /// Highest hybrid score observed.
        best_score: f32,
        /// Floor that was applied.
        threshold: f32,
    },

    /// The transcript could not be embedded.
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Convenience result type for context operations.
pub type ContextResult<T> = Result<T, ContextError>;
