//! Ingestion, search and deletion through the public service API.

mod common;

use common::fixtures::{DIM, DOCUMENT_ID, FAITHFUL_TRANSCRIPT, ZORG_DOCUMENT, grader};
use common::harness::TestHarness;
use recital::{EvaluationOptions, IngestMode, PipelineError, RecordingEmbeddingProvider, UpstreamStage};

#[tokio::test]
async fn test_ingest_then_search() {
    let harness = TestHarness::with_zorg().await;

    let summaries = harness.service.documents();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, DOCUMENT_ID);

    let results = harness
        .service
        .search_similar("moons Ip and Op", Some(DOCUMENT_ID), 3)
        .await
        .unwrap();
    assert!(!results.is_empty());
    assert!(results[0].text().contains("moons"));
}

#[tokio::test]
async fn test_deleted_document_cannot_be_evaluated() {
    let harness = TestHarness::with_zorg().await;

    harness.service.delete_document(DOCUMENT_ID).unwrap();
    assert!(harness.service.index().is_empty());

    let err = harness
        .service
        .evaluate(FAITHFUL_TRANSCRIPT, DOCUMENT_ID, EvaluationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.to_response().code, 404);
}

#[tokio::test]
async fn test_degraded_document_fails_retrieval_when_embeddings_stay_down() {
    let embedder = RecordingEmbeddingProvider::new(DIM).failing_first(100, 503);
    let harness = TestHarness::build(embedder, grader);

    let report = harness
        .service
        .process_document_with_mode(ZORG_DOCUMENT, DOCUMENT_ID, IngestMode::Degraded)
        .await
        .unwrap();
    assert!(report.degraded);

    let err = harness
        .service
        .evaluate(FAITHFUL_TRANSCRIPT, DOCUMENT_ID, EvaluationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Upstream {
            stage: UpstreamStage::Retrieval,
            ..
        }
    ));
    assert_eq!(err.status_code(), 400);
    assert_eq!(harness.chat.call_count(), 0);
}

#[tokio::test]
async fn test_embedding_recovers_after_transient_failure() {
    let embedder = RecordingEmbeddingProvider::new(DIM).failing_first(1, 503);
    let harness = TestHarness::build(embedder.clone(), grader);

    let report = harness
        .service
        .process_document(ZORG_DOCUMENT, DOCUMENT_ID)
        .await
        .unwrap();

    assert!(!report.degraded);
    assert_eq!(embedder.call_count(), 2);
}
