use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use crate::llm::error::LlmError;

/// Single-turn chat completion backend.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, LlmError>;

    fn name(&self) -> &str;
}

/// Chat provider backed by `genai`; the model name selects the adapter.
#[derive(Clone)]
pub struct GenaiChatProvider {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiChatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiChatProvider")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenaiChatProvider {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatProvider for GenaiChatProvider {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if !system_prompt.is_empty() {
            messages.push(ChatMessage::system(system_prompt));
        }
        messages.push(ChatMessage::user(prompt));

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending chat request");

        let response = self
            .client
            .exec_chat(&self.model, ChatRequest::new(messages), None)
            .await?;

        response
            .first_text()
            .map(str::to_string)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
