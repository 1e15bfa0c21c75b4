use std::sync::Arc;
use std::time::Duration;

use super::mock::{FailingEmbeddingProvider, RecordingEmbeddingProvider};
use super::*;
use crate::language::LanguageProfile;

const DIM: usize = 64;

fn test_config() -> EmbeddingConfig {
    EmbeddingConfig::default()
        .dimension(DIM)
        .batch_size(16)
        .batch_delay(Duration::ZERO)
        .attempts(3, Duration::from_millis(1))
}

fn client_with(provider: Arc<dyn EmbeddingProvider>, config: EmbeddingConfig) -> EmbeddingClient {
    EmbeddingClient::new(provider, config, Arc::new(LanguageProfile::english())).unwrap()
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[test]
fn test_stub_is_deterministic_and_normalized() {
    let stub = StubEmbeddingProvider::new(DIM);
    let a = stub.embed_one("The sky on Zorg is green");
    let b = stub.embed_one("The sky on Zorg is green");
    assert_eq!(a, b);
    assert_eq!(a.len(), DIM);

    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[test]
fn test_stub_empty_text_is_zero_vector() {
    let stub = StubEmbeddingProvider::new(DIM);
    assert!(stub.embed_one("  ... ").iter().all(|x| *x == 0.0));
}

#[test]
fn test_stub_shared_tokens_raise_cosine() {
    let stub = StubEmbeddingProvider::new(768);
    let doc = stub.embed_one("zorg has two moons and a green sky");
    let related = stub.embed_one("the green sky of zorg");
    let unrelated = stub.embed_one("quarterly revenue forecast spreadsheet");

    assert!(cosine(&doc, &related) > 0.25);
    assert!(cosine(&doc, &unrelated).abs() < 0.2);
}

#[tokio::test]
async fn test_batches_are_capped_and_order_preserved() {
    let provider = RecordingEmbeddingProvider::new(DIM);
    let client = client_with(Arc::new(provider.clone()), test_config());
    let texts: Vec<String> = (0..40).map(|i| format!("text number {i}")).collect();

    let vectors = client.embed_batch(&texts).await.unwrap();

    let sizes: Vec<usize> = provider.calls().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![16, 16, 8]);
    assert_eq!(vectors.len(), 40);

    let stub = StubEmbeddingProvider::new(DIM);
    assert_eq!(vectors[0], stub.embed_one("text number 0"));
    assert_eq!(vectors[39], stub.embed_one("text number 39"));
}

#[tokio::test]
async fn test_empty_batch_makes_no_calls() {
    let provider = RecordingEmbeddingProvider::new(DIM);
    let client = client_with(Arc::new(provider.clone()), test_config());
    assert!(client.embed_batch(&[]).await.unwrap().is_empty());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let provider = RecordingEmbeddingProvider::new(DIM).failing_first(2, 503);
    let client = client_with(Arc::new(provider.clone()), test_config());

    let vector = client.embed("green sky").await.unwrap();
    assert_eq!(vector.len(), DIM);
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let provider = RecordingEmbeddingProvider::new(DIM).failing_first(10, 429);
    let client = client_with(Arc::new(provider.clone()), test_config());

    let err = client.embed("green sky").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Status { status: 429, .. }));
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let provider = RecordingEmbeddingProvider::new(DIM).failing_first(1, 400);
    let client = client_with(Arc::new(provider.clone()), test_config());

    assert!(client.embed("green sky").await.is_err());
    assert_eq!(provider.call_count(), 1);

    let failing = FailingEmbeddingProvider::new(DIM);
    let client = client_with(Arc::new(failing.clone()), test_config());
    assert!(client.embed("green sky").await.is_err());
    assert_eq!(failing.call_count(), 1);
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let provider = RecordingEmbeddingProvider::new(DIM).with_delay(Duration::from_millis(500));
    let config = test_config()
        .timeout(Duration::from_millis(20))
        .attempts(1, Duration::from_millis(1));
    let client = client_with(Arc::new(provider), config);

    let err = client.embed("green sky").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Timeout { after_ms: 20 }));
}

#[tokio::test]
async fn test_wrong_dimension_is_rejected() {
    let provider = RecordingEmbeddingProvider::new(DIM).with_wrong_dimension();
    let client = client_with(Arc::new(provider), test_config());

    let err = client.embed("green sky").await.unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::DimensionMismatch {
            expected: DIM,
            actual: 65
        }
    ));
}

#[test]
fn test_provider_dimension_must_match_config() {
    let provider = Arc::new(StubEmbeddingProvider::new(32));
    let result = EmbeddingClient::new(provider, test_config(), Arc::default());
    assert!(matches!(
        result,
        Err(EmbeddingError::DimensionMismatch { expected: DIM, actual: 32 })
    ));
}

#[tokio::test]
async fn test_query_embeddings_are_cached() {
    let provider = RecordingEmbeddingProvider::new(DIM);
    let client = client_with(Arc::new(provider.clone()), test_config());

    let first = client.embed_query("The sky is GREEN!").await.unwrap();
    let second = client.embed_query("the sky is green").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_query_cache_can_be_disabled() {
    let provider = RecordingEmbeddingProvider::new(DIM);
    let client = client_with(
        Arc::new(provider.clone()),
        test_config().query_cache_capacity(0),
    );

    client.embed_query("green sky").await.unwrap();
    client.embed_query("green sky").await.unwrap();
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_embed_chunks_applies_preprocessing() {
    let provider = RecordingEmbeddingProvider::new(DIM);
    let client = client_with(Arc::new(provider.clone()), test_config());

    client
        .embed_chunks(&["Zorg has two moons.".to_string()])
        .await
        .unwrap();
    assert_eq!(
        provider.calls()[0],
        vec!["Document excerpt: Zorg has two moons.".to_string()]
    );
}

#[test]
fn test_preprocess_query_expands_and_appends_synonyms() {
    let profile = LanguageProfile::english();
    assert_eq!(
        preprocess_query("It's a BIG problem!", &profile),
        "it is a big problem large huge issue challenge"
    );
}

#[test]
fn test_preprocess_query_bounds_synonyms() {
    let profile = LanguageProfile::english().with_query_synonym_limits(1, 2);
    assert_eq!(
        preprocess_query("big fast small", &profile),
        "big fast small large quick"
    );
}

#[test]
fn test_preprocess_query_keeps_accents() {
    let profile = LanguageProfile::spanish();
    assert_eq!(
        preprocess_query("¿Cuál es el planeta?", &profile),
        "cuál es el planeta mundo"
    );
}

#[test]
fn test_preprocess_chunk_prefixes_short_text() {
    let profile = LanguageProfile::english();
    assert_eq!(
        preprocess_chunk("Short\n\nline!!!", &profile, 50),
        "Document excerpt: Short line!"
    );

    let long = "A sufficiently long chunk of text that clears the minimum length easily.";
    assert_eq!(preprocess_chunk(long, &profile, 50), long);
}

#[test]
fn test_retry_backoff_grows_and_caps() {
    let base = Duration::from_millis(200);
    assert_eq!(retry_backoff(base, 0), Duration::from_millis(200));
    assert_eq!(retry_backoff(base, 1), Duration::from_millis(400));
    assert_eq!(retry_backoff(base, 2), Duration::from_millis(800));
    assert_eq!(retry_backoff(base, 9), Duration::from_millis(5_000));
}

#[test]
fn test_api_parsing_and_endpoint() {
    assert_eq!("OpenAI".parse::<EmbeddingApi>().unwrap(), EmbeddingApi::OpenAi);
    assert!("grpc".parse::<EmbeddingApi>().is_err());

    let mut config = EmbeddingConfig {
        url: "http://embed:8080/v1/".to_string(),
        api: EmbeddingApi::OpenAi,
        ..Default::default()
    };
    assert_eq!(config.endpoint(), "http://embed:8080/v1/embeddings");
    config.api = EmbeddingApi::Ollama;
    assert_eq!(config.endpoint(), "http://embed:8080/v1/api/embed");
}

#[test]
fn test_config_validation() {
    assert!(EmbeddingConfig::default().validate().is_ok());
    assert!(EmbeddingConfig::default().dimension(0).validate().is_err());
    assert!(EmbeddingConfig::default().batch_size(0).validate().is_err());
    assert!(
        EmbeddingConfig::default()
            .attempts(0, Duration::from_millis(1))
            .validate()
            .is_err()
    );
}

#[test]
fn test_http_provider_builds_endpoint() {
    let config = EmbeddingConfig {
        api_key: Some("secret".to_string()),
        ..Default::default()
    };
    let provider = HttpEmbeddingProvider::new(&config).unwrap();
    assert_eq!(provider.endpoint(), "http://localhost:11434/api/embed");
    assert_eq!(provider.dimension(), config.dimension);
}
