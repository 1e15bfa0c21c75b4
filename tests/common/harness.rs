//! Builds an [`EvaluationService`] wired to recording test doubles.

use std::sync::Arc;
use std::time::Duration;

use recital::config::Config;
use recital::llm::LlmError;
use recital::{EvaluationService, RecordingEmbeddingProvider, ScriptedChatProvider};

use super::fixtures::{DIM, DOCUMENT_ID, ZORG_DOCUMENT, grader};

pub struct TestHarness {
    pub service: EvaluationService,
    pub embedder: RecordingEmbeddingProvider,
    pub chat: ScriptedChatProvider,
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.embedding = config
        .embedding
        .dimension(DIM)
        .batch_delay(Duration::ZERO)
        .attempts(2, Duration::from_millis(1));
    config.llm.retry_base_delay = Duration::from_millis(1);
    config
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_responder(grader)
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self::build(RecordingEmbeddingProvider::new(DIM), responder)
    }

    pub fn build<F>(embedder: RecordingEmbeddingProvider, responder: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        let chat = ScriptedChatProvider::new(responder);
        let service = EvaluationService::new(
            test_config(),
            Arc::new(embedder.clone()),
            Arc::new(chat.clone()),
        )
        .expect("test config is valid");
        Self {
            service,
            embedder,
            chat,
        }
    }

    /// Harness with the Zorg document already ingested.
    pub async fn with_zorg() -> Self {
        let harness = Self::new();
        harness
            .service
            .process_document(ZORG_DOCUMENT, DOCUMENT_ID)
            .await
            .expect("ingestion succeeds");
        harness
    }
}
