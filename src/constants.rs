//! Cross-cutting, shared constants.
//!
//! Scoring weights and thresholds live here so the retrieval and verification layers
//! agree on them. Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is constant within one index instance. If you need a
//! different model:
//!
//! 1. Use [`DimConfig`] to pass the dimension through initialization
//! 2. [`DEFAULT_EMBEDDING_DIM`] remains the default for local embedding models

pub const DEFAULT_EMBEDDING_DIM: usize = 768;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

pub const DEFAULT_BATCH_SIZE: usize = 16;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 100;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// Total attempts per external call, including the first.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;
/// Upper bound on a single backoff sleep.
pub const MAX_RETRY_DELAY_MS: u64 = 5_000;

/// Chunks shorter than this are prefixed before embedding.
pub const DEFAULT_MIN_CHUNK_CHARS: usize = 50;
pub const DEFAULT_QUERY_CACHE_CAPACITY: u64 = 1_024;

/// Bound on concurrent pairwise judgment and fact-check calls.
pub const DEFAULT_CONCURRENCY: usize = 4;
/// Transcript concepts per document concept sent for a model judgment.
pub const DEFAULT_MAX_PAIRWISE_CANDIDATES: usize = 3;
/// Transcripts with fewer words are rejected before any external call.
pub const MIN_TRANSCRIPT_WORDS: usize = 3;

pub const DEFAULT_MAX_RELEVANT_CHUNKS: usize = 5;
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.1;

/// Hybrid score weights. They sum to 1.0, which keeps the blend inside [0,1].
pub const COSINE_WEIGHT: f32 = 0.6;
pub const JACCARD_WEIGHT: f32 = 0.2;
pub const SEMANTIC_WEIGHT: f32 = 0.2;

/// Contribution of a synonym-group hit relative to an exact token match.
pub const SYNONYM_MATCH_WEIGHT: f32 = 0.8;
/// Contribution of a stem-prefix hit relative to an exact token match.
pub const PARTIAL_MATCH_WEIGHT: f32 = 0.5;

/// A document concept counts as present at or above this similarity.
pub const PRESENCE_THRESHOLD: f32 = 0.6;
/// Present concepts below this similarity are flagged as distorted.
pub const DISTORTION_THRESHOLD: f32 = 0.8;

pub const MISSING_CONCEPT_PENALTY: f32 = 60.0;
pub const EXTRA_CONCEPT_PENALTY: f32 = 15.0;
pub const EXTRA_FIDELITY_PENALTY: f32 = 30.0;
pub const DISTORTION_PENALTY_SCALE: f32 = 10.0;
pub const FULL_COVERAGE_BONUS: f32 = 5.0;

/// Neutral criterion value used when the scoring response cannot be parsed.
pub const FALLBACK_CRITERION_SCORE: f32 = 70.0;

/// Runtime dimension configuration for modules that must agree on vector size.
///
/// The [`validate`](DimConfig::validate) method rejects degenerate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration with the specified embedding dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Returns an error if `embedding_dim` is zero.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_weights_sum_to_one() {
        let sum = COSINE_WEIGHT + JACCARD_WEIGHT + SEMANTIC_WEIGHT;
        assert!((sum - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_thresholds_are_ordered() {
        assert!(PRESENCE_THRESHOLD < DISTORTION_THRESHOLD);
        assert!(PARTIAL_MATCH_WEIGHT < SYNONYM_MATCH_WEIGHT);
    }

    #[test]
    fn test_dim_config_default() {
        let config = DimConfig::default();
        assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
    }

    #[test]
    fn test_dim_config_validate_zero() {
        let config = DimConfig::new(0);
        assert_eq!(config.validate(), Err(DimValidationError::ZeroDimension));
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::ZeroDimension;
        assert_eq!(err.to_string(), "embedding dimension cannot be zero");
    }
}
