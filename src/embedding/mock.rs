//! Test doubles for [`EmbeddingProvider`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::embedding::error::EmbeddingError;
use crate::embedding::provider::EmbeddingProvider;
use crate::embedding::stub::StubEmbeddingProvider;

/// Stub embeddings that record every batch and can fail or stall on demand.
#[derive(Debug, Clone)]
pub struct RecordingEmbeddingProvider {
    inner: StubEmbeddingProvider,
    dimension: usize,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    failures_left: Arc<AtomicUsize>,
    failure_status: u16,
    delay: Option<Duration>,
    wrong_dimension: bool,
}

impl RecordingEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: StubEmbeddingProvider::new(dimension),
            dimension,
            calls: Arc::new(Mutex::new(Vec::new())),
            failures_left: Arc::new(AtomicUsize::new(0)),
            failure_status: 503,
            delay: None,
            wrong_dimension: false,
        }
    }

    /// Fails the next `count` calls with the given HTTP status.
    pub fn failing_first(self, count: usize, status: u16) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        Self {
            failure_status: status,
            ..self
        }
    }

    /// Sleeps before answering each call.
    pub fn with_delay(self, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..self
        }
    }

    /// Returns vectors one element too long.
    pub fn with_wrong_dimension(self) -> Self {
        Self {
            wrong_dimension: true,
            ..self
        }
    }

    /// Batches received, including failed attempts.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl EmbeddingProvider for RecordingEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.lock().push(texts.to_vec());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(EmbeddingError::Status {
                status: self.failure_status,
                body: "injected failure".to_string(),
            });
        }

        let mut vectors = self.inner.embed_batch(texts).await?;
        if self.wrong_dimension {
            for v in &mut vectors {
                v.push(0.0);
            }
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Provider that fails every call with a non-retryable transport error.
#[derive(Debug, Clone, Default)]
pub struct FailingEmbeddingProvider {
    dimension: usize,
    calls: Arc<AtomicUsize>,
}

impl FailingEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EmbeddingError::Request {
            reason: "connection refused".to_string(),
            retryable: false,
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "failing"
    }
}
