//! Hybrid similarity: cosine blended with lexical and synonym-aware overlap.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::constants::{
    COSINE_WEIGHT, JACCARD_WEIGHT, PARTIAL_MATCH_WEIGHT, SEMANTIC_WEIGHT, SYNONYM_MATCH_WEIGHT,
};
use crate::language::{LanguageProfile, content_token_set};
use crate::vectordb::model::ScoreBreakdown;

/// Weights of the three signals. The defaults sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridWeights {
    pub cosine: f32,
    pub jaccard: f32,
    pub semantic: f32,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            cosine: COSINE_WEIGHT,
            jaccard: JACCARD_WEIGHT,
            semantic: SEMANTIC_WEIGHT,
        }
    }
}

/// Query-side state computed once per query.
#[derive(Debug, Clone)]
pub struct PreparedQuery<'a> {
    vector: &'a [f32],
    tokens: HashSet<String>,
    folded: String,
}

#[derive(Debug, Clone, Default)]
pub struct HybridScorer {
    profile: Arc<LanguageProfile>,
    weights: HybridWeights,
}

impl HybridScorer {
    pub fn new(profile: Arc<LanguageProfile>) -> Self {
        Self {
            profile,
            weights: HybridWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: HybridWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> HybridWeights {
        self.weights
    }

    pub fn prepare<'a>(&self, vector: &'a [f32], query_text: &str) -> PreparedQuery<'a> {
        PreparedQuery {
            vector,
            tokens: content_token_set(query_text),
            folded: fold(query_text),
        }
    }

    /// Hybrid score in [0,1] with its components.
    pub fn score(
        &self,
        query: &PreparedQuery<'_>,
        vector: &[f32],
        text: &str,
    ) -> (f32, ScoreBreakdown) {
        let doc_tokens = content_token_set(text);
        let cosine = cosine_similarity(query.vector, vector);
        let breakdown = if query.tokens.is_empty() && doc_tokens.is_empty() {
            // Only short tokens on both sides: lexical signals compare the texts whole.
            let same = if !query.folded.is_empty() && query.folded == fold(text) {
                1.0
            } else {
                0.0
            };
            ScoreBreakdown {
                cosine,
                jaccard: same,
                semantic: same,
            }
        } else {
            ScoreBreakdown {
                cosine,
                jaccard: jaccard_similarity(&query.tokens, &doc_tokens),
                semantic: semantic_overlap(&query.tokens, &doc_tokens, &self.profile),
            }
        };

        let w = self.weights;
        let hybrid = w.cosine * breakdown.cosine
            + w.jaccard * breakdown.jaccard
            + w.semantic * breakdown.semantic;
        (hybrid.clamp(0.0, 1.0), breakdown)
    }

    /// Scores two raw texts with their vectors.
    pub fn score_texts(
        &self,
        query_vector: &[f32],
        query_text: &str,
        vector: &[f32],
        text: &str,
    ) -> (f32, ScoreBreakdown) {
        let prepared = self.prepare(query_vector, query_text);
        self.score(&prepared, vector, text)
    }
}

fn fold(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Cosine similarity clamped to [0,1].
///
/// Empty, mismatched or non-finite input scores 0 and is logged.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        warn!(
            left = a.len(),
            right = b.len(),
            "Cosine similarity on empty or mismatched vectors"
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if !dot.is_finite() || !norm_a.is_finite() || !norm_b.is_finite() {
        warn!("Cosine similarity on non-finite vector values");
        return 0.0;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Jaccard index of two token sets; two empty sets score 0.
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}

/// Mean per-query-token match strength: exact 1.0, synonym 0.8, shared stem 0.5.
pub fn semantic_overlap(
    query: &HashSet<String>,
    document: &HashSet<String>,
    profile: &LanguageProfile,
) -> f32 {
    if query.is_empty() {
        return 0.0;
    }

    let total: f32 = query
        .iter()
        .map(|token| {
            if document.contains(token) {
                1.0
            } else if document.iter().any(|d| profile.are_synonyms(token, d)) {
                SYNONYM_MATCH_WEIGHT
            } else if document.iter().any(|d| profile.shares_stem(token, d)) {
                PARTIAL_MATCH_WEIGHT
            } else {
                0.0
            }
        })
        .sum();

    (total / query.len() as f32).clamp(0.0, 1.0)
}
