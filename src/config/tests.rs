use super::*;
use crate::chunking::ChunkStrategy;
use crate::embedding::EmbeddingApi;
use serial_test::serial;
use std::env;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_recital_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        for name in Config::ENV_VARS {
            env::remove_var(name);
        }
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.embedding.url, "http://localhost:11434");
    assert_eq!(config.embedding.api, EmbeddingApi::Ollama);
    assert_eq!(config.embedding.dimension, 768);
    assert_eq!(config.embedding.batch_size, 16);
    assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
    assert_eq!(config.chunker.chunk_size, 1000);
    assert_eq!(config.chunker.overlap, 200);
    assert_eq!(config.context.max_chunks, 5);
    assert_eq!(config.verifier.concurrency, 4);
    assert_eq!(config.language, "en");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_recital_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.embedding.model, "nomic-embed-text");
    assert!(config.embedding.api_key.is_none());
    assert_eq!(config.llm.max_attempts, 3);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_recital_env();

    let config = with_env_vars(
        &[
            ("RECITAL_EMBEDDING_URL", "https://api.example.com/v1"),
            ("RECITAL_EMBEDDING_API", "openai"),
            ("RECITAL_EMBEDDING_API_KEY", "sk-test"),
            ("RECITAL_EMBEDDING_DIM", "1536"),
            ("RECITAL_EMBEDDING_BATCH_SIZE", "8"),
            ("RECITAL_EMBEDDING_BATCH_DELAY_MS", "0"),
            ("RECITAL_CHAT_MODEL", "llama3.1"),
            ("RECITAL_REQUEST_TIMEOUT_SECS", "15"),
            ("RECITAL_MAX_RETRIES", "5"),
            ("RECITAL_CHUNK_SIZE", "500"),
            ("RECITAL_CHUNK_OVERLAP", "50"),
            ("RECITAL_CHUNK_STRATEGY", "sentence"),
            ("RECITAL_MAX_CHUNKS", "3"),
            ("RECITAL_MIN_SIMILARITY", "0.25"),
            ("RECITAL_LANGUAGE", "es"),
            ("RECITAL_CONCURRENCY", "2"),
        ],
        Config::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.embedding.url, "https://api.example.com/v1");
    assert_eq!(config.embedding.api, EmbeddingApi::OpenAi);
    assert_eq!(config.embedding.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.embedding.dimension, 1536);
    assert_eq!(config.embedding.batch_size, 8);
    assert!(config.embedding.batch_delay.is_zero());
    assert_eq!(config.chat_model, "llama3.1");
    assert_eq!(config.embedding.timeout, Duration::from_secs(15));
    assert_eq!(config.llm.timeout, Duration::from_secs(15));
    assert_eq!(config.embedding.max_attempts, 5);
    assert_eq!(config.llm.max_attempts, 5);
    assert_eq!(config.chunker.chunk_size, 500);
    assert_eq!(config.chunker.overlap, 50);
    assert_eq!(config.chunker.strategy, ChunkStrategy::BySentence);
    assert_eq!(config.context.max_chunks, 3);
    assert_eq!(config.context.min_similarity, 0.25);
    assert_eq!(config.profile().unwrap().name(), "es");
    assert_eq!(config.verifier.concurrency, 2);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_blank_values_fall_back_to_defaults() {
    clear_recital_env();

    let config = with_env_vars(
        &[("RECITAL_EMBEDDING_MODEL", "   "), ("RECITAL_CHUNK_SIZE", "")],
        Config::from_env,
    )
    .unwrap();

    assert_eq!(config.embedding.model, "nomic-embed-text");
    assert_eq!(config.chunker.chunk_size, 1000);
}

#[test]
#[serial]
fn test_invalid_integer() {
    clear_recital_env();

    let result = with_env_vars(&[("RECITAL_EMBEDDING_DIM", "wide")], Config::from_env);

    match result {
        Err(ConfigError::InvalidInteger { name, value, .. }) => {
            assert_eq!(name, "RECITAL_EMBEDDING_DIM");
            assert_eq!(value, "wide");
        }
        other => panic!("expected InvalidInteger, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_invalid_float() {
    clear_recital_env();

    let result = with_env_vars(&[("RECITAL_MIN_SIMILARITY", "high")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidFloat { .. })));
}

#[test]
#[serial]
fn test_unknown_embedding_api() {
    clear_recital_env();

    let result = with_env_vars(&[("RECITAL_EMBEDDING_API", "grpc")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::Embedding(_))));
}

#[test]
#[serial]
fn test_unknown_chunk_strategy() {
    clear_recital_env();

    let result = with_env_vars(&[("RECITAL_CHUNK_STRATEGY", "pages")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::Chunking(_))));
}

#[test]
fn test_validate_rejects_overlap_not_below_size() {
    let mut config = Config::default();
    config.chunker.overlap = config.chunker.chunk_size;
    assert!(matches!(config.validate(), Err(ConfigError::Chunking(_))));
}

#[test]
fn test_validate_rejects_out_of_range_similarity() {
    let mut config = Config::default();
    config.context.min_similarity = 1.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_max_chunks() {
    let mut config = Config::default();
    config.context.max_chunks = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange { .. })
    ));
}

#[test]
fn test_validate_rejects_unknown_language() {
    let config = Config {
        language: "klingon".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::UnknownLanguage { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_concurrency() {
    let mut config = Config::default();
    config.verifier.concurrency = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Verifier(_))));
}

#[test]
fn test_validate_rejects_zero_dimension() {
    let mut config = Config::default();
    config.embedding.dimension = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Embedding(_))));
}
