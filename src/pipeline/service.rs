use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::chunking::{Chunker, char_count, normalize_text, word_count};
use crate::config::Config;
use crate::constants::MIN_TRANSCRIPT_WORDS;
use crate::context::{ContextAssembler, ContextBundle};
use crate::embedding::{EmbeddingClient, EmbeddingProvider, HttpEmbeddingProvider};
use crate::llm::{ChatProvider, GenaiChatProvider, LlmClient};
use crate::pipeline::error::{PipelineError, UpstreamStage};
use crate::pipeline::types::{
    Document, DocumentSummary, EvaluationOptions, IngestMode, ProcessReport,
};
use crate::scoring::{EvaluationResult, VerificationRequest, Verifier};
use crate::vectordb::{HybridScorer, RetrievalResult, VectorIndex, VectorRecord};

/// Owns the document registry and runs ingestion, retrieval and evaluation.
///
/// Shared behind an `Arc`; every method takes `&self`.
pub struct EvaluationService {
    config: Config,
    chunker: Chunker,
    embedder: Arc<EmbeddingClient>,
    index: Arc<VectorIndex>,
    assembler: ContextAssembler,
    verifier: Verifier,
    documents: RwLock<HashMap<String, Arc<Document>>>,
}

impl std::fmt::Debug for EvaluationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationService")
            .field("embedder", &self.embedder.provider_name())
            .field("documents", &self.documents.read().len())
            .field("records", &self.index.count(None))
            .finish_non_exhaustive()
    }
}

impl EvaluationService {
    /// Wires the components over the given providers. The config is validated first.
    pub fn new(
        config: Config,
        embedder: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let profile = Arc::new(config.profile()?);

        let chunker = Chunker::new(config.chunker.clone()).map_err(crate::config::ConfigError::from)?;
        let embedder = Arc::new(EmbeddingClient::new(
            embedder,
            config.embedding.clone(),
            Arc::clone(&profile),
        )?);
        let index = Arc::new(VectorIndex::new(
            config.embedding.dimension,
            HybridScorer::new(Arc::clone(&profile)),
        )?);
        let assembler = ContextAssembler::new(Arc::clone(&embedder), Arc::clone(&index), config.context);
        let llm = Arc::new(LlmClient::new(chat, config.llm)?);
        let verifier =
            Verifier::new(llm, profile, config.verifier).map_err(crate::config::ConfigError::from)?;

        info!(
            embedder = embedder.provider_name(),
            dimension = config.embedding.dimension,
            language = %config.language,
            "Evaluation service ready"
        );

        Ok(Self {
            config,
            chunker,
            embedder,
            index,
            assembler,
            verifier,
            documents: RwLock::new(HashMap::new()),
        })
    }

    /// Production wiring: HTTP embeddings and a `genai` chat backend.
    pub fn from_config(config: Config) -> Result<Self, PipelineError> {
        let embedder = Arc::new(HttpEmbeddingProvider::new(&config.embedding)?);
        let chat = Arc::new(GenaiChatProvider::new(config.chat_model.clone()));
        Self::new(config, embedder, chat)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Default per-request options derived from the context config.
    pub fn default_options(&self) -> EvaluationOptions {
        EvaluationOptions::from(&self.config.context)
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Chunks, embeds and indexes `text` under `document_id`, replacing any
    /// previous version of the document. Blank text registers with zero chunks.
    pub async fn process_document(
        &self,
        text: &str,
        document_id: &str,
    ) -> Result<ProcessReport, PipelineError> {
        self.process_document_with_mode(text, document_id, IngestMode::Normal)
            .await
    }

    #[instrument(skip(self, text), fields(document_id = %document_id, mode = ?mode, text_len = text.len()))]
    pub async fn process_document_with_mode(
        &self,
        text: &str,
        document_id: &str,
        mode: IngestMode,
    ) -> Result<ProcessReport, PipelineError> {
        validate_document_id(document_id)?;
        let normalized = normalize_text(text);

        let chunks = self.chunker.chunk(&normalized);
        if chunks.is_empty() {
            debug!("Document has no content, registering without chunks");
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

        let (vectors, degraded) = match self.embedder.embed_chunks(&texts).await {
            Ok(vectors) => (vectors, false),
            Err(err) if mode == IngestMode::Degraded => {
                warn!(error = %err, chunks = texts.len(), "Embedding failed, storing zero vectors");
                (vec![vec![0.0; self.embedder.dimension()]; texts.len()], true)
            }
            Err(err) => return Err(PipelineError::upstream(UpstreamStage::Ingestion, err)),
        };

        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                VectorRecord::from_chunk(document_id, chunk, vector).with_degraded(degraded)
            })
            .collect();

        let replaced = self.index.delete_by_document(document_id);
        let stored = self.index.upsert(records)?;

        let document = Document {
            id: document_id.to_string(),
            word_count: word_count(&normalized),
            char_count: char_count(&normalized),
            text: normalized,
            chunk_count: stored,
            ingested_at: Utc::now(),
            degraded,
        };
        let report = ProcessReport {
            chunk_count: document.chunk_count,
            word_count: document.word_count,
            char_count: document.char_count,
            degraded,
        };
        self.documents
            .write()
            .insert(document_id.to_string(), Arc::new(document));

        info!(
            chunks = report.chunk_count,
            words = report.word_count,
            replaced,
            degraded,
            "Document processed"
        );
        Ok(report)
    }

    /// Removes the document and every record derived from it.
    #[instrument(skip(self))]
    pub fn delete_document(&self, document_id: &str) -> Result<(), PipelineError> {
        let removed = self.documents.write().remove(document_id);
        if removed.is_none() {
            return Err(PipelineError::NotFound {
                document_id: document_id.to_string(),
            });
        }
        let records = self.index.delete_by_document(document_id);
        info!(records, "Document deleted");
        Ok(())
    }

    /// Ranks indexed chunks against a free-text query.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn search_similar(
        &self,
        query: &str,
        document_id: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::InputValidation("query is empty".to_string()));
        }
        if let Some(id) = document_id {
            self.require_document(id)?;
        }

        let vector = self
            .embedder
            .embed_query(query)
            .await
            .map_err(|err| PipelineError::upstream(UpstreamStage::Retrieval, err))?;
        let results = self
            .index
            .query(&vector, &query.to_lowercase(), top_k, document_id);
        debug!(results = results.len(), "Similarity search complete");
        Ok(results)
    }

    /// Retrieves supporting passages for a transcript with the configured floor.
    pub async fn get_relevant_context(
        &self,
        transcript: &str,
        document_id: &str,
        max_chunks: usize,
    ) -> Result<ContextBundle, PipelineError> {
        validate_transcript(transcript)?;
        self.require_document(document_id)?;
        Ok(self
            .assembler
            .get_relevant_context(transcript, document_id, max_chunks)
            .await?)
    }

    /// Scores a transcript against the named document.
    ///
    /// Input is validated before any embedding or chat call.
    #[instrument(
        skip(self, transcript, options),
        fields(document_id = %document_id, fact_check = options.fact_check)
    )]
    pub async fn evaluate(
        &self,
        transcript: &str,
        document_id: &str,
        options: EvaluationOptions,
    ) -> Result<EvaluationResult, PipelineError> {
        let started_at = Utc::now();
        validate_document_id(document_id)?;
        validate_transcript(transcript)?;
        validate_options(&options)?;
        self.require_document(document_id)?;

        let context = self
            .assembler
            .retrieve(
                transcript,
                document_id,
                options.max_relevant_chunks,
                options.min_similarity_score,
            )
            .await?;
        debug!(
            chunks = context.len(),
            total_score = context.total_score,
            "Context retrieved"
        );

        let result = self
            .verifier
            .verify(VerificationRequest {
                document_id,
                transcript,
                context: &context,
                fact_check: options.fact_check,
                started_at,
            })
            .await?;
        Ok(result)
    }

    pub fn document(&self, document_id: &str) -> Option<Arc<Document>> {
        self.documents.read().get(document_id).cloned()
    }

    /// Summaries of every registered document, ordered by id.
    pub fn documents(&self) -> Vec<DocumentSummary> {
        let mut summaries: Vec<DocumentSummary> = self
            .documents
            .read()
            .values()
            .map(|d| d.summary())
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    fn require_document(&self, document_id: &str) -> Result<(), PipelineError> {
        if self.documents.read().contains_key(document_id) {
            Ok(())
        } else {
            Err(PipelineError::NotFound {
                document_id: document_id.to_string(),
            })
        }
    }
}

fn validate_document_id(document_id: &str) -> Result<(), PipelineError> {
    if document_id.trim().is_empty() {
        return Err(PipelineError::InputValidation(
            "document id is empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_transcript(transcript: &str) -> Result<(), PipelineError> {
    let words = transcript.split_whitespace().count();
    if words < MIN_TRANSCRIPT_WORDS {
        return Err(PipelineError::InputValidation(format!(
            "transcript has {words} words, at least {MIN_TRANSCRIPT_WORDS} required"
        )));
    }
    Ok(())
}

fn validate_options(options: &EvaluationOptions) -> Result<(), PipelineError> {
    if options.max_relevant_chunks == 0 {
        return Err(PipelineError::InputValidation(
            "max_relevant_chunks must be at least 1".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&options.min_similarity_score) {
        return Err(PipelineError::InputValidation(format!(
            "min_similarity_score {} is not within [0, 1]",
            options.min_similarity_score
        )));
    }
    Ok(())
}
