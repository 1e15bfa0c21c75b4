use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::factcheck::FactCheckReport;

/// The five rubric axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Accuracy,
    Clarity,
    Completeness,
    Coherence,
    Fluency,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Accuracy,
        Criterion::Clarity,
        Criterion::Completeness,
        Criterion::Coherence,
        Criterion::Fluency,
    ];

    /// JSON key used in prompts and responses.
    pub fn key(&self) -> &'static str {
        match self {
            Criterion::Accuracy => "accuracy",
            Criterion::Clarity => "clarity",
            Criterion::Completeness => "completeness",
            Criterion::Coherence => "coherence",
            Criterion::Fluency => "fluency",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Scores in [0,100] for each criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionScores {
    pub accuracy: f32,
    pub clarity: f32,
    pub completeness: f32,
    pub coherence: f32,
    pub fluency: f32,
}

impl CriterionScores {
    pub fn uniform(value: f32) -> Self {
        Self {
            accuracy: value,
            clarity: value,
            completeness: value,
            coherence: value,
            fluency: value,
        }
    }

    pub fn get(&self, criterion: Criterion) -> f32 {
        match criterion {
            Criterion::Accuracy => self.accuracy,
            Criterion::Clarity => self.clarity,
            Criterion::Completeness => self.completeness,
            Criterion::Coherence => self.coherence,
            Criterion::Fluency => self.fluency,
        }
    }

    pub fn set(&mut self, criterion: Criterion, value: f32) {
        let slot = match criterion {
            Criterion::Accuracy => &mut self.accuracy,
            Criterion::Clarity => &mut self.clarity,
            Criterion::Completeness => &mut self.completeness,
            Criterion::Coherence => &mut self.coherence,
            Criterion::Fluency => &mut self.fluency,
        };
        *slot = value;
    }

    /// Mean of the five criteria.
    pub fn overall(&self) -> f32 {
        Criterion::ALL.iter().map(|c| self.get(*c)).sum::<f32>() / Criterion::ALL.len() as f32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed: String,
}

/// Stages of one verification run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStage {
    Retrieved,
    Scored,
    ConceptChecked,
    Reconciled,
    Finalized,
}

impl VerificationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStage::Retrieved => "retrieved",
            VerificationStage::Scored => "scored",
            VerificationStage::ConceptChecked => "concept_checked",
            VerificationStage::Reconciled => "reconciled",
            VerificationStage::Finalized => "finalized",
        }
    }

    /// Stages reachable from `self`. `Scored` may skip straight to `Finalized`
    /// when the concept check fails.
    pub fn can_advance_to(&self, next: VerificationStage) -> bool {
        use VerificationStage::*;
        matches!(
            (self, next),
            (Retrieved, Scored)
                | (Scored, ConceptChecked)
                | (Scored, Finalized)
                | (ConceptChecked, Reconciled)
                | (Reconciled, Finalized)
        )
    }
}

impl fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic concept comparison between context and transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptCoherenceSummary {
    pub document_concepts: usize,
    pub transcript_concepts: usize,
    pub matched: usize,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    pub distorted: Vec<String>,
    /// Matched share of document concepts, in percent.
    pub coverage: f32,
    pub fidelity: f32,
    /// Concept-derived accuracy ceiling used during reconciliation.
    pub forced_accuracy: f32,
    pub average_similarity: f32,
    /// Pairs judged by the model rather than by word overlap.
    pub model_judgments: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationMetadata {
    pub evaluation_id: Uuid,
    pub document_id: String,
    pub transcript_words: usize,
    pub transcript_chars: usize,
    pub chunks_used: usize,
    pub context_score: f32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub processing_ms: u64,
    pub stages: Vec<VerificationStage>,
    /// The scoring response could not be parsed and neutral scores were used.
    pub parse_fallback: bool,
    pub concept_check_error: Option<String>,
    pub concept_coherence: Option<ConceptCoherenceSummary>,
}

/// Final output of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub scores: CriterionScores,
    /// Mean of the five reconciled criteria.
    pub overall: f32,
    pub feedback: Feedback,
    /// Criterion scores exactly as the model reported them.
    pub llm_scores: CriterionScores,
    pub fact_check: Option<FactCheckReport>,
    pub metadata: EvaluationMetadata,
}
