//! Embedding client and providers.
//!
//! - [`EmbeddingProvider`] is the single-call backend seam
//!   ([`HttpEmbeddingProvider`], [`StubEmbeddingProvider`]).
//! - [`EmbeddingClient`] adds batching, retry with backoff, per-call timeouts,
//!   dimension checks and a query cache on top of a provider.

mod client;
pub mod config;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod preprocess;
mod provider;
mod stub;

#[cfg(test)]
mod tests;

pub use client::EmbeddingClient;
pub(crate) use client::retry_backoff;
pub use config::{EmbeddingApi, EmbeddingConfig};
pub use error::EmbeddingError;
pub use preprocess::{preprocess_chunk, preprocess_query};
pub use provider::{EmbeddingProvider, HttpEmbeddingProvider};
pub use stub::StubEmbeddingProvider;
