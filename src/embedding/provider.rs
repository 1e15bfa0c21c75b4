use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::config::{EmbeddingApi, EmbeddingConfig};
use crate::embedding::error::EmbeddingError;

/// A single-attempt embedding backend.
///
/// Batching, retries and timeouts are applied by
/// [`EmbeddingClient`](super::EmbeddingClient); implementations issue one call
/// per invocation and preserve input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimension of the vectors this provider produces.
    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

/// Embedding provider speaking the Ollama or OpenAI-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingProvider {
    client: Client,
    endpoint: String,
    model: String,
    api: EmbeddingApi,
    dimension: usize,
}

impl HttpEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;
        if config.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding model name is empty".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            let auth = HeaderValue::from_str(&format!("Bearer {}", key.trim())).map_err(|_| {
                EmbeddingError::InvalidConfig {
                    reason: "api key contains invalid header characters".to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            model: config.model.clone(),
            api: config.api,
            dimension: config.dimension,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<B: Serialize + Sync, R: for<'de> Deserialize<'de>>(
        &self,
        body: &B,
    ) -> Result<R, EmbeddingError> {
        let response = self.client.post(&self.endpoint).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            endpoint = %self.endpoint,
            api = %self.api,
            batch = texts.len(),
            "Requesting embeddings"
        );

        match self.api {
            EmbeddingApi::Ollama => {
                let request = OllamaRequest {
                    model: &self.model,
                    input: texts,
                };
                let parsed: OllamaResponse = self.post(&request).await?;
                Ok(parsed.embeddings)
            }
            EmbeddingApi::OpenAi => {
                let request = OpenAiRequest {
                    model: &self.model,
                    input: texts,
                    dimensions: Some(self.dimension),
                };
                let mut parsed: OpenAiResponse = self.post(&request).await?;
                parsed.data.sort_by_key(|entry| entry.index);
                Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
            }
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        self.api.as_str()
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbedding {
    embedding: Vec<f32>,
    index: usize,
}
