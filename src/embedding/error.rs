use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {reason}")]
    Request { reason: String, retryable: bool },

    #[error("embedding provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("embedding request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("provider returned {actual} embeddings for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    #[error("invalid embedding configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl EmbeddingError {
    /// Transient failures worth another attempt: timeouts, transport errors,
    /// rate limiting and server errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::Request { retryable, .. } => *retryable,
            EmbeddingError::Status { status, .. } => *status == 429 || *status >= 500,
            EmbeddingError::Timeout { .. } => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        let retryable = err.is_timeout() || err.is_connect() || err.is_body() || err.is_request();
        if err.is_decode() {
            return EmbeddingError::InvalidResponse {
                reason: err.to_string(),
            };
        }
        EmbeddingError::Request {
            reason: err.to_string(),
            retryable,
        }
    }
}
