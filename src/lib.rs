//! Recital library crate (used by the `recital` binary and integration tests).
//!
//! Scores a spoken presentation against the document it was supposed to present.
//! The document is chunked and embedded into an in-memory index; a transcript
//! pulls its most relevant passages, and a chat model grades it on five criteria.
//! Those grades are then capped by an independent concept comparison so that
//! missing, invented or distorted ideas cannot score well.
//!
//! # Public API Surface
//!
//! ## Service
//! - [`EvaluationService`] - Document registry plus ingest/search/evaluate operations
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//! - [`PipelineError`] - Aggregate error with HTTP-equivalent status codes
//!
//! ## Components
//! - [`Chunker`] - Paragraph/sentence/word chunking with overlap
//! - [`EmbeddingClient`], [`EmbeddingProvider`] - Batched, retried embeddings
//! - [`VectorIndex`], [`HybridScorer`] - Hybrid cosine/lexical/synonym ranking
//! - [`ContextAssembler`] - Transcript to ranked supporting passages
//! - [`LlmClient`], [`ChatProvider`] - Chat completions with timeout and retry
//! - [`Verifier`] - Rubric scoring, concept reconciliation and fact-checking
//! - [`LanguageProfile`] - Contractions, synonyms and stop words per language
//!
//! ## Test/Mock Support
//! Mock providers are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod chunking;
pub mod config;
pub mod constants;
pub mod context;
pub mod embedding;
pub mod hashing;
pub mod language;
pub mod llm;
pub mod pipeline;
pub mod scoring;
pub mod vectordb;

pub use chunking::{Chunk, ChunkStrategy, Chunker, ChunkerConfig, ChunkingError};
pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError};
pub use context::{ContextAssembler, ContextBundle, ContextConfig, ContextError};
pub use embedding::{
    EmbeddingApi, EmbeddingClient, EmbeddingConfig, EmbeddingError, EmbeddingProvider,
    HttpEmbeddingProvider, StubEmbeddingProvider,
};
pub use hashing::{chunk_id, hash_text, hash_to_u64};
pub use language::LanguageProfile;
pub use llm::{ChatProvider, GenaiChatProvider, LlmClient, LlmConfig, LlmError};
pub use pipeline::{
    Document, DocumentSummary, ErrorResponse, EvaluationOptions, EvaluationService, IngestMode,
    PipelineError, ProcessReport, UpstreamStage,
};
pub use scoring::{
    Criterion, CriterionScores, EvaluationResult, FactCheckReport, Feedback, ScoringError,
    VerificationStage, Verifier, VerifierConfig,
};
pub use vectordb::{
    HybridScorer, HybridWeights, RetrievalResult, VectorDbError, VectorIndex, VectorRecord,
};

#[cfg(any(test, feature = "mock"))]
pub use embedding::mock::{FailingEmbeddingProvider, RecordingEmbeddingProvider};
#[cfg(any(test, feature = "mock"))]
pub use llm::mock::ScriptedChatProvider;
