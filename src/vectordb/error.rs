use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
/// Errors returned by vector index operations.
pub enum VectorDbError {
    /// Vector dimension mismatch.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Index dimension.
        expected: usize,
        /// Dimension of the rejected vector.
        actual: usize,
    },

    /// The index was created with an unusable dimension.
    #[error("invalid index configuration: {0}")]
    InvalidConfig(#[from] DimValidationError),

    /// A record carried an empty identifier.
    #[error("record for chunk {chunk_index} has an empty document id")]
    EmptyDocumentId {
        /// Chunk index of the rejected record.
        chunk_index: usize,
    },
}
