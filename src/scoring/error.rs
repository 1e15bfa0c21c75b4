use thiserror::Error;

use crate::llm::LlmError;
use crate::scoring::types::VerificationStage;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// The primary scoring call failed after retries.
    #[error("scoring request failed: {0}")]
    Upstream(#[source] LlmError),

    /// A concept extraction call failed; the concept check is abandoned.
    #[error("concept extraction failed for {side}: {source}")]
    ConceptExtraction {
        side: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("illegal stage transition {from} -> {to}")]
    InvalidTransition {
        from: VerificationStage,
        to: VerificationStage,
    },
}
