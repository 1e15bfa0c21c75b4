use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_BASE_DELAY_MS};
use crate::embedding::retry_backoff;
use crate::llm::error::LlmError;
use crate::llm::provider::ChatProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmConfig {
    /// Per-call timeout.
    pub timeout: Duration,
    /// Total attempts for retried calls, including the first.
    pub max_attempts: usize,
    pub retry_base_delay: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }
}

impl LlmConfig {
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.timeout.is_zero() {
            return Err(LlmError::InvalidConfig {
                reason: "timeout must be non-zero".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(LlmError::InvalidConfig {
                reason: "max_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Timeout and retry policy around a [`ChatProvider`].
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn ChatProvider>,
    config: LlmConfig,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

impl LlmClient {
    pub fn new(provider: Arc<dyn ChatProvider>, config: LlmConfig) -> Result<Self, LlmError> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// One attempt bounded by the configured timeout.
    pub async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, LlmError> {
        tokio::time::timeout(self.config.timeout, self.provider.complete(prompt, system_prompt))
            .await
            .map_err(|_| LlmError::Timeout {
                after_ms: self.config.timeout.as_millis() as u64,
            })?
    }

    /// Retries transient failures with exponential backoff.
    pub async fn complete_with_retry(
        &self,
        prompt: &str,
        system_prompt: &str,
    ) -> Result<String, LlmError> {
        let mut attempt = 0usize;
        loop {
            match self.complete(prompt, system_prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt + 1 < self.config.max_attempts => {
                    let delay = retry_backoff(self.config.retry_base_delay, attempt);
                    warn!(
                        provider = self.provider.name(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Chat call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
