//! Recital command-line entrypoint.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mimalloc::MiMalloc;

use recital::config::Config;
use recital::embedding::{EmbeddingProvider, HttpEmbeddingProvider, StubEmbeddingProvider};
use recital::llm::GenaiChatProvider;
use recital::pipeline::{EvaluationOptions, EvaluationService, IngestMode};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DOCUMENT_ID: &str = "document";

#[derive(Parser, Debug)]
#[command(
    name = "recital",
    version,
    about = "Score a presentation transcript against the document it presents"
)]
struct Args {
    /// Reference document (plain text)
    document: PathBuf,

    /// Presentation transcript (plain text)
    transcript: PathBuf,

    /// Attach a statement-level fact-check report
    #[arg(long)]
    fact_check: bool,

    /// Use deterministic stub embeddings and degraded ingestion
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let document = std::fs::read_to_string(&args.document)
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let transcript = std::fs::read_to_string(&args.transcript)
        .with_context(|| format!("failed to read {}", args.transcript.display()))?;

    let embedder: Arc<dyn EmbeddingProvider> = if args.offline {
        tracing::warn!("Offline mode, using stub embeddings");
        Arc::new(StubEmbeddingProvider::new(config.embedding.dimension))
    } else {
        Arc::new(HttpEmbeddingProvider::new(&config.embedding)?)
    };
    let chat = Arc::new(GenaiChatProvider::new(config.chat_model.clone()));
    let options = EvaluationOptions::from(&config.context).fact_check(args.fact_check);
    let mode = if args.offline {
        IngestMode::Degraded
    } else {
        IngestMode::Normal
    };

    tracing::info!(
        embedding_url = %config.embedding.url,
        chat_model = %config.chat_model,
        offline = args.offline,
        "Recital starting"
    );

    let service = EvaluationService::new(config, embedder, chat)?;

    let report = service
        .process_document_with_mode(&document, DOCUMENT_ID, mode)
        .await?;
    tracing::info!(
        chunks = report.chunk_count,
        words = report.word_count,
        degraded = report.degraded,
        "Document ingested"
    );

    match service.evaluate(&transcript, DOCUMENT_ID, options).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string_pretty(&err.to_response())?);
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_parse_files_and_flags() {
        let args = Args::try_parse_from([
            "recital",
            "doc.txt",
            "talk.txt",
            "--fact-check",
            "--offline",
        ])
        .unwrap();
        assert_eq!(args.document, PathBuf::from("doc.txt"));
        assert_eq!(args.transcript, PathBuf::from("talk.txt"));
        assert!(args.fact_check);
        assert!(args.offline);

        let args = Args::try_parse_from(["recital", "doc.txt", "talk.txt"]).unwrap();
        assert!(!args.fact_check);
        assert!(!args.offline);
    }

    #[test]
    fn test_args_reject_missing_transcript_and_unknown_flags() {
        assert!(Args::try_parse_from(["recital", "doc.txt"]).is_err());
        assert!(Args::try_parse_from(["recital", "doc.txt", "talk.txt", "--verbose"]).is_err());
    }
}
