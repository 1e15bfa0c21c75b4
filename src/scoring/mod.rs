//! Verification of a transcript against retrieved context.
//!
//! A run moves through [`VerificationStage`]s in order:
//!
//! 1. `Retrieved`: context was assembled by the caller.
//! 2. `Scored`: the model grades five criteria with a strict rubric.
//! 3. `ConceptChecked`: concepts are extracted from both texts and cross-matched.
//! 4. `Reconciled`: accuracy and completeness are capped by the concept metrics.
//! 5. `Finalized`
//!
//! A failed concept check is not fatal: the run skips from `Scored` to
//! `Finalized` and keeps the model's scores. The optional fact-check runs
//! before finalization and is reported on its own.

pub mod concepts;
pub mod error;
pub mod factcheck;
pub mod reconcile;
pub mod rubric;
pub mod types;
mod verifier;


pub use concepts::{Concept, ConceptMatch, ConceptMatcher, ConceptReport, SimilaritySource};
pub use error::ScoringError;
pub use factcheck::{FactCheckReport, FactChecker, Severity, StatementCheck};
pub use reconcile::{forced_accuracy, reconcile_scores};
pub use rubric::LlmEvaluation;
pub use types::{
    ConceptCoherenceSummary, Criterion, CriterionScores, EvaluationMetadata, EvaluationResult,
    Feedback, VerificationStage,
};
pub use verifier::{StageTrail, VerificationRequest, Verifier, VerifierConfig};
