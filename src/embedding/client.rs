use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::{debug, instrument, warn};

use crate::constants::MAX_RETRY_DELAY_MS;
use crate::embedding::config::EmbeddingConfig;
use crate::embedding::error::EmbeddingError;
use crate::embedding::preprocess::{preprocess_chunk, preprocess_query};
use crate::embedding::provider::EmbeddingProvider;
use crate::hashing::hash_text;
use crate::language::LanguageProfile;

/// Batching, retrying front end over an [`EmbeddingProvider`].
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    config: EmbeddingConfig,
    profile: Arc<LanguageProfile>,
    query_cache: Option<Cache<[u8; 32], Arc<Vec<f32>>>>,
}

impl std::fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("provider", &self.provider.name())
            .field("dimension", &self.config.dimension)
            .field("batch_size", &self.config.batch_size)
            .field("language", &self.profile.name())
            .field("query_cache", &self.query_cache.is_some())
            .finish()
    }
}

impl EmbeddingClient {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        config: EmbeddingConfig,
        profile: Arc<LanguageProfile>,
    ) -> Result<Self, EmbeddingError> {
        config.validate()?;
        if provider.dimension() != config.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: config.dimension,
                actual: provider.dimension(),
            });
        }

        let query_cache =
            (config.query_cache_capacity > 0).then(|| Cache::new(config.query_cache_capacity));

        Ok(Self {
            provider,
            config,
            profile,
            query_cache,
        })
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Embeds one text as-is.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or(EmbeddingError::CountMismatch {
            expected: 1,
            actual: 0,
        })
    }

    /// Embeds texts in order, `batch_size` at a time with `batch_delay` between
    /// batches. Each batch is retried independently.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());

        for (i, batch) in texts.chunks(self.config.batch_size).enumerate() {
            if i > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
            vectors.extend(self.embed_with_retry(batch).await?);
        }

        Ok(vectors)
    }

    /// Applies chunk preprocessing, then embeds.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn embed_chunks(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let prepared: Vec<String> = chunks
            .iter()
            .map(|c| preprocess_chunk(c, &self.profile, self.config.min_chunk_chars))
            .collect();
        self.embed_batch(&prepared).await
    }

    /// Applies query preprocessing, then embeds through the query cache.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbeddingError> {
        let prepared = preprocess_query(query, &self.profile);
        let key = hash_text(&prepared);

        if let Some(cached) = self.query_cache.as_ref().and_then(|c| c.get(&key)) {
            debug!("Query embedding cache hit");
            return Ok(cached.as_ref().clone());
        }

        let vector = self.embed(&prepared).await?;
        if let Some(cache) = &self.query_cache {
            cache.insert(key, Arc::new(vector.clone()));
        }
        Ok(vector)
    }

    async fn embed_with_retry(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut attempt = 0usize;
        loop {
            match self.call_once(batch).await {
                Ok(vectors) => return Ok(vectors),
                Err(err) if err.is_retryable() && attempt + 1 < self.config.max_attempts => {
                    let delay = retry_backoff(self.config.retry_base_delay, attempt);
                    warn!(
                        provider = self.provider.name(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Embedding call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn call_once(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let vectors = tokio::time::timeout(self.config.timeout, self.provider.embed_batch(batch))
            .await
            .map_err(|_| EmbeddingError::Timeout {
                after_ms: self.config.timeout.as_millis() as u64,
            })??;

        if vectors.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: vectors.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.config.dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimension,
                actual: bad.len(),
            });
        }
        Ok(vectors)
    }
}

/// `base * 2^attempt`, capped.
pub(crate) fn retry_backoff(base: Duration, attempt: usize) -> Duration {
    let factor = 1u32 << attempt.min(10) as u32;
    base.saturating_mul(factor)
        .min(Duration::from_millis(MAX_RETRY_DELAY_MS))
}
