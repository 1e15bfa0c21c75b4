use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::context::ContextError;
use crate::embedding::EmbeddingError;
use crate::llm::LlmError;
use crate::scoring::ScoringError;
use crate::vectordb::VectorDbError;

/// Stage at which an external call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamStage {
    Ingestion,
    Retrieval,
    Scoring,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpstreamStage::Ingestion => "ingestion",
            UpstreamStage::Retrieval => "retrieval",
            UpstreamStage::Scoring => "scoring",
        })
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Rejected before any external call.
    #[error("invalid input: {0}")]
    InputValidation(String),

    #[error("document '{document_id}' not found")]
    NotFound { document_id: String },

    /// Every candidate chunk scored below the similarity floor.
    #[error("transcript does not match the document (best score {best_score:.3} < {threshold:.2})")]
    NoRelevantContext { best_score: f32, threshold: f32 },

    #[error("{stage} call failed: {message}")]
    Upstream {
        stage: UpstreamStage,
        message: String,
    },

    #[error("model output could not be used: {0}")]
    MalformedModelOutput(String),

    #[error("index error: {0}")]
    Index(#[from] VectorDbError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Serializable error body for callers that speak HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
}

impl PipelineError {
    pub(crate) fn upstream(stage: UpstreamStage, err: impl fmt::Display) -> Self {
        PipelineError::Upstream {
            stage,
            message: err.to_string(),
        }
    }

    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::InputValidation(_) => 400,
            PipelineError::NotFound { .. } => 404,
            PipelineError::NoRelevantContext { .. } => 422,
            PipelineError::Upstream {
                stage: UpstreamStage::Ingestion | UpstreamStage::Retrieval,
                ..
            } => 400,
            PipelineError::Upstream {
                stage: UpstreamStage::Scoring,
                ..
            } => 502,
            PipelineError::MalformedModelOutput(_) => 502,
            PipelineError::Index(_) | PipelineError::Config(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InputValidation(_) => "input_validation",
            PipelineError::NotFound { .. } => "not_found",
            PipelineError::NoRelevantContext { .. } => "no_relevant_context",
            PipelineError::Upstream { .. } => "upstream_error",
            PipelineError::MalformedModelOutput(_) => "malformed_model_output",
            PipelineError::Index(_) => "index_error",
            PipelineError::Config(_) => "config_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.status_code(),
            kind: self.kind(),
        }
    }
}

impl From<ContextError> for PipelineError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::NoContextFound { document_id } => PipelineError::NotFound { document_id },
            ContextError::NoRelevantContext {
                best_score,
                threshold,
            } => PipelineError::NoRelevantContext {
                best_score,
                threshold,
            },
            ContextError::Embedding(err) => PipelineError::upstream(UpstreamStage::Retrieval, err),
        }
    }
}

impl From<ScoringError> for PipelineError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Upstream(source) if source.is_malformed_output() => {
                PipelineError::MalformedModelOutput(source.to_string())
            }
            ScoringError::Upstream(source) => {
                PipelineError::upstream(UpstreamStage::Scoring, source)
            }
            ScoringError::InvalidInput { reason } => PipelineError::InputValidation(reason),
            other => PipelineError::upstream(UpstreamStage::Scoring, other),
        }
    }
}

impl From<EmbeddingError> for PipelineError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::InvalidConfig { .. } | EmbeddingError::DimensionMismatch { .. } => {
                PipelineError::Config(ConfigError::Embedding(err))
            }
            other => PipelineError::upstream(UpstreamStage::Ingestion, other),
        }
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::InvalidConfig { .. } => PipelineError::Config(ConfigError::Llm(err)),
            other if other.is_malformed_output() => {
                PipelineError::MalformedModelOutput(other.to_string())
            }
            other => PipelineError::upstream(UpstreamStage::Scoring, other),
        }
    }
}
