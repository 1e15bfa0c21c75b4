use async_trait::async_trait;
use tracing::debug;

use crate::embedding::error::EmbeddingError;
use crate::embedding::provider::EmbeddingProvider;
use crate::hashing::{hash_text, hash_to_u64};
use crate::language::tokenize;

/// Deterministic offline embeddings.
///
/// Each token maps to a pseudorandom unit direction seeded by its hash; a text
/// embeds as the normalized sum of its token directions. Texts sharing tokens
/// have positive cosine, unrelated texts land near zero. Empty text yields the
/// zero vector.
#[derive(Debug, Clone)]
pub struct StubEmbeddingProvider {
    dimension: usize,
}

impl StubEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let mut state = hash_to_u64(&hash_text(&token));
            for value in embedding.iter_mut() {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                *value += ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(batch = texts.len(), "Generating stub embeddings");
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "stub"
    }
}
