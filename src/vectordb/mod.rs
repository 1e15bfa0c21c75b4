//! In-memory vector index with hybrid similarity ranking.

pub mod error;
pub mod hybrid;
mod index;
pub mod model;


pub use error::VectorDbError;
pub use hybrid::{
    HybridScorer, HybridWeights, cosine_similarity, jaccard_similarity, semantic_overlap,
};
pub use index::VectorIndex;
pub use model::{RecordMetadata, RetrievalResult, ScoreBreakdown, VectorRecord};
