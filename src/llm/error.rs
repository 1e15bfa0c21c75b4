use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("chat request failed: {reason}")]
    Request { reason: String },

    #[error("chat request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("chat response contained no text")]
    EmptyResponse,

    #[error("no JSON object in model output: {preview}")]
    NoJsonObject { preview: String },

    #[error("model output is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("invalid chat configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl LlmError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Request { .. } | LlmError::Timeout { .. } | LlmError::EmptyResponse
        )
    }

    /// True when the call succeeded but its output could not be used.
    pub fn is_malformed_output(&self) -> bool {
        matches!(
            self,
            LlmError::NoJsonObject { .. } | LlmError::InvalidJson { .. }
        )
    }
}

impl From<genai::Error> for LlmError {
    fn from(err: genai::Error) -> Self {
        LlmError::Request {
            reason: err.to_string(),
        }
    }
}
