//! Configuration error types.

use thiserror::Error;

use crate::chunking::ChunkingError;
use crate::embedding::EmbeddingError;
use crate::llm::LlmError;
use crate::scoring::ScoringError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An integer variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidInteger {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A float variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidFloat {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// A value parsed but lies outside its allowed range.
    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    /// A string setting was set to an empty value.
    #[error("{name} must not be empty")]
    EmptyValue { name: &'static str },

    /// No built-in language profile has this name.
    #[error("unknown language '{value}' (expected en or es)")]
    UnknownLanguage { value: String },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Chunking(#[from] ChunkingError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Verifier(#[from] ScoringError),
}
