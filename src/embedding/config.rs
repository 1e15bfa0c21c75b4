use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE, DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MIN_CHUNK_CHARS, DEFAULT_QUERY_CACHE_CAPACITY, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_BASE_DELAY_MS,
};
use crate::embedding::error::EmbeddingError;

/// Wire format of the embedding endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingApi {
    /// `POST {url}/api/embed` with `{"model", "input"}`.
    #[default]
    Ollama,
    /// `POST {url}/embeddings` with `{"model", "input", "dimensions"}`.
    OpenAi,
}

impl EmbeddingApi {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingApi::Ollama => "ollama",
            EmbeddingApi::OpenAi => "openai",
        }
    }
}

impl fmt::Display for EmbeddingApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingApi {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(EmbeddingApi::Ollama),
            "openai" | "open-ai" | "openai-compatible" => Ok(EmbeddingApi::OpenAi),
            other => Err(EmbeddingError::InvalidConfig {
                reason: format!("unknown embedding api '{other}' (expected ollama or openai)"),
            }),
        }
    }
}

/// Settings for [`EmbeddingClient`](super::EmbeddingClient) and
/// [`HttpEmbeddingProvider`](super::HttpEmbeddingProvider).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding service.
    pub url: String,
    pub model: String,
    pub api: EmbeddingApi,
    pub api_key: Option<String>,
    /// Expected vector dimension; provider output is checked against it.
    pub dimension: usize,
    /// Maximum texts per provider call.
    pub batch_size: usize,
    /// Pause between consecutive batches.
    pub batch_delay: Duration,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Total attempts per batch, including the first.
    pub max_attempts: usize,
    /// Base delay for exponential backoff.
    pub retry_base_delay: Duration,
    /// Chunks shorter than this get the language profile prefix.
    pub min_chunk_chars: usize,
    /// Query embedding cache entries; zero disables the cache.
    pub query_cache_capacity: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            api: EmbeddingApi::Ollama,
            api_key: None,
            dimension: DEFAULT_EMBEDDING_DIM,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            min_chunk_chars: DEFAULT_MIN_CHUNK_CHARS,
            query_cache_capacity: DEFAULT_QUERY_CACHE_CAPACITY,
        }
    }
}

impl EmbeddingConfig {
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn attempts(mut self, max_attempts: usize, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.retry_base_delay = base_delay;
        self
    }

    pub fn query_cache_capacity(mut self, capacity: u64) -> Self {
        self.query_cache_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        let invalid = |reason: &str| {
            Err(EmbeddingError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.dimension == 0 {
            return invalid("dimension must be greater than zero");
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be greater than zero");
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1");
        }
        if self.timeout.is_zero() {
            return invalid("timeout must be non-zero");
        }
        Ok(())
    }

    /// Full endpoint URL for the configured wire format.
    pub fn endpoint(&self) -> String {
        let base = self.url.trim_end_matches('/');
        match self.api {
            EmbeddingApi::Ollama => format!("{base}/api/embed"),
            EmbeddingApi::OpenAi => format!("{base}/embeddings"),
        }
    }
}
