use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkingError {
    #[error("invalid chunker configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("unknown chunk strategy '{value}' (expected paragraph, sentence or word)")]
    UnknownStrategy { value: String },
}
