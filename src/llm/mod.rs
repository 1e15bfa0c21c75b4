//! Chat-completion access for the verification pipeline.
//!
//! [`ChatProvider`] is the backend seam ([`GenaiChatProvider`] in production);
//! [`LlmClient`] adds per-call timeouts and bounded retries, and [`json`] recovers
//! a JSON object from free-form model output.

mod client;
mod error;
pub mod json;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod provider;

#[cfg(test)]
mod tests;

pub use client::{LlmClient, LlmConfig};
pub use error::LlmError;
pub use json::{extract_json_object, parse_json_object};
pub use provider::{ChatProvider, GenaiChatProvider};
