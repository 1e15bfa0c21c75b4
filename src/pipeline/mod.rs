//! Long-lived evaluation service.
//!
//! [`EvaluationService`] owns the document registry and wires the chunker,
//! embedding client, vector index, context assembler and verifier together.
//! Errors from every component surface as [`PipelineError`], which maps onto
//! HTTP-equivalent status codes through [`PipelineError::status_code`].

mod error;
mod service;
mod types;


pub use error::{ErrorResponse, PipelineError, UpstreamStage};
pub use service::EvaluationService;
pub use types::{Document, DocumentSummary, EvaluationOptions, IngestMode, ProcessReport};
