//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RECITAL_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::chunking::ChunkerConfig;
use crate::context::ContextConfig;
use crate::embedding::EmbeddingConfig;
use crate::language::LanguageProfile;
use crate::llm::LlmConfig;
use crate::scoring::VerifierConfig;

/// Default chat model used when `RECITAL_CHAT_MODEL` is not set.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Default language profile used when `RECITAL_LANGUAGE` is not set.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Pipeline configuration, one section per component.
///
/// Use [`Config::from_env`] to read `RECITAL_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub embedding: EmbeddingConfig,

    /// Model name handed to the chat backend. Default: `gpt-4o-mini`.
    pub chat_model: String,

    pub llm: LlmConfig,

    pub chunker: ChunkerConfig,

    pub context: ContextConfig,

    pub verifier: VerifierConfig,

    /// Language profile name (`en` or `es`). Default: `en`.
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            llm: LlmConfig::default(),
            chunker: ChunkerConfig::default(),
            context: ContextConfig::default(),
            verifier: VerifierConfig::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    const ENV_EMBEDDING_URL: &'static str = "RECITAL_EMBEDDING_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "RECITAL_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API: &'static str = "RECITAL_EMBEDDING_API";
    const ENV_EMBEDDING_API_KEY: &'static str = "RECITAL_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_DIM: &'static str = "RECITAL_EMBEDDING_DIM";
    const ENV_EMBEDDING_BATCH_SIZE: &'static str = "RECITAL_EMBEDDING_BATCH_SIZE";
    const ENV_EMBEDDING_BATCH_DELAY_MS: &'static str = "RECITAL_EMBEDDING_BATCH_DELAY_MS";
    const ENV_CHAT_MODEL: &'static str = "RECITAL_CHAT_MODEL";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "RECITAL_REQUEST_TIMEOUT_SECS";
    /// Total attempts per external call, including the first.
    const ENV_MAX_RETRIES: &'static str = "RECITAL_MAX_RETRIES";
    const ENV_CHUNK_SIZE: &'static str = "RECITAL_CHUNK_SIZE";
    const ENV_CHUNK_OVERLAP: &'static str = "RECITAL_CHUNK_OVERLAP";
    const ENV_CHUNK_STRATEGY: &'static str = "RECITAL_CHUNK_STRATEGY";
    const ENV_MAX_CHUNKS: &'static str = "RECITAL_MAX_CHUNKS";
    const ENV_MIN_SIMILARITY: &'static str = "RECITAL_MIN_SIMILARITY";
    const ENV_LANGUAGE: &'static str = "RECITAL_LANGUAGE";
    const ENV_CONCURRENCY: &'static str = "RECITAL_CONCURRENCY";

    /// Names of every variable read by [`Config::from_env`].
    pub const ENV_VARS: [&'static str; 17] = [
        Self::ENV_EMBEDDING_URL,
        Self::ENV_EMBEDDING_MODEL,
        Self::ENV_EMBEDDING_API,
        Self::ENV_EMBEDDING_API_KEY,
        Self::ENV_EMBEDDING_DIM,
        Self::ENV_EMBEDDING_BATCH_SIZE,
        Self::ENV_EMBEDDING_BATCH_DELAY_MS,
        Self::ENV_CHAT_MODEL,
        Self::ENV_REQUEST_TIMEOUT_SECS,
        Self::ENV_MAX_RETRIES,
        Self::ENV_CHUNK_SIZE,
        Self::ENV_CHUNK_OVERLAP,
        Self::ENV_CHUNK_STRATEGY,
        Self::ENV_MAX_CHUNKS,
        Self::ENV_MIN_SIMILARITY,
        Self::ENV_LANGUAGE,
        Self::ENV_CONCURRENCY,
    ];

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Unparseable values are errors; range checks happen in [`Config::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let embedding = &mut config.embedding;
        embedding.url = Self::parse_string_from_env(Self::ENV_EMBEDDING_URL, embedding.url.clone());
        embedding.model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, embedding.model.clone());
        if let Some(api) = Self::optional_var(Self::ENV_EMBEDDING_API) {
            embedding.api = api.parse()?;
        }
        if let Some(key) = Self::optional_var(Self::ENV_EMBEDDING_API_KEY) {
            embedding.api_key = Some(key);
        }
        embedding.dimension = Self::parse_int_from_env(Self::ENV_EMBEDDING_DIM, embedding.dimension)?;
        embedding.batch_size =
            Self::parse_int_from_env(Self::ENV_EMBEDDING_BATCH_SIZE, embedding.batch_size)?;
        embedding.batch_delay = Duration::from_millis(Self::parse_int_from_env(
            Self::ENV_EMBEDDING_BATCH_DELAY_MS,
            embedding.batch_delay.as_millis() as u64,
        )?);

        config.chat_model = Self::parse_string_from_env(Self::ENV_CHAT_MODEL, config.chat_model);

        // Shared by embedding and chat calls.
        let timeout = Duration::from_secs(Self::parse_int_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            config.llm.timeout.as_secs(),
        )?);
        let max_attempts =
            Self::parse_int_from_env(Self::ENV_MAX_RETRIES, config.llm.max_attempts)?;
        config.embedding.timeout = timeout;
        config.embedding.max_attempts = max_attempts;
        config.llm.timeout = timeout;
        config.llm.max_attempts = max_attempts;

        config.chunker.chunk_size =
            Self::parse_int_from_env(Self::ENV_CHUNK_SIZE, config.chunker.chunk_size)?;
        config.chunker.overlap =
            Self::parse_int_from_env(Self::ENV_CHUNK_OVERLAP, config.chunker.overlap)?;
        if let Some(strategy) = Self::optional_var(Self::ENV_CHUNK_STRATEGY) {
            config.chunker.strategy = strategy.parse()?;
        }

        config.context.max_chunks =
            Self::parse_int_from_env(Self::ENV_MAX_CHUNKS, config.context.max_chunks)?;
        config.context.min_similarity =
            Self::parse_float_from_env(Self::ENV_MIN_SIMILARITY, config.context.min_similarity)?;

        config.language = Self::parse_string_from_env(Self::ENV_LANGUAGE, config.language);
        config.verifier.concurrency =
            Self::parse_int_from_env(Self::ENV_CONCURRENCY, config.verifier.concurrency)?;

        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.embedding.validate()?;
        self.llm.validate()?;
        self.chunker.validate()?;
        self.verifier.validate()?;

        if self.chat_model.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_CHAT_MODEL,
            });
        }
        if self.context.max_chunks == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_MAX_CHUNKS,
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.context.min_similarity) {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_MIN_SIMILARITY,
                reason: format!("{} is not within [0, 1]", self.context.min_similarity),
            });
        }
        self.profile()?;

        Ok(())
    }

    /// The language profile named by [`Config::language`].
    pub fn profile(&self) -> Result<LanguageProfile, ConfigError> {
        LanguageProfile::from_name(&self.language).ok_or_else(|| ConfigError::UnknownLanguage {
            value: self.language.clone(),
        })
    }

    fn optional_var(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::optional_var(var_name).unwrap_or(default)
    }

    fn parse_int_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        match Self::optional_var(var_name) {
            Some(value) => value.parse().map_err(|source| ConfigError::InvalidInteger {
                name: var_name,
                value,
                source,
            }),
            None => Ok(default),
        }
    }

    fn parse_float_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match Self::optional_var(var_name) {
            Some(value) => value.parse().map_err(|source| ConfigError::InvalidFloat {
                name: var_name,
                value,
                source,
            }),
            None => Ok(default),
        }
    }
}
