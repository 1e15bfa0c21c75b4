//! Scripted [`ChatProvider`] for tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::llm::error::LlmError;
use crate::llm::provider::ChatProvider;

type Responder = dyn Fn(&str, &str) -> Result<String, LlmError> + Send + Sync;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub system_prompt: String,
}

/// Answers prompts through a closure and records every call.
#[derive(Clone)]
pub struct ScriptedChatProvider {
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Option<Duration>,
}

impl std::fmt::Debug for ScriptedChatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedChatProvider")
            .field("calls", &self.calls.lock().len())
            .finish_non_exhaustive()
    }
}

impl ScriptedChatProvider {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Returns the same text for every prompt.
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_, _| Ok(text.clone()))
    }

    /// Fails every call with a transport error.
    pub fn failing() -> Self {
        Self::new(|_, _| {
            Err(LlmError::Request {
                reason: "scripted failure".to_string(),
            })
        })
    }

    /// Returns the responses in order, then repeats the last one.
    pub fn sequence(responses: Vec<Result<String, LlmError>>) -> Self {
        let queue = Arc::new(Mutex::new(responses));
        Self::new(move |_, _| {
            let mut queue = queue.lock();
            if queue.len() > 1 {
                queue.remove(0)
            } else {
                match queue.first() {
                    Some(Ok(text)) => Ok(text.clone()),
                    Some(Err(_)) | None => Err(LlmError::EmptyResponse),
                }
            }
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Calls whose prompt contains `needle`.
    pub fn calls_containing(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.prompt.contains(needle))
            .count()
    }
}

#[async_trait]
impl ChatProvider for ScriptedChatProvider {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, LlmError> {
        self.calls.lock().push(RecordedCall {
            prompt: prompt.to_string(),
            system_prompt: system_prompt.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(prompt, system_prompt)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
