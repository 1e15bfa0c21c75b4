use std::sync::Arc;
use std::time::Duration;

use super::mock::ScriptedChatProvider;
use super::*;

fn fast_config() -> LlmConfig {
    LlmConfig {
        timeout: Duration::from_secs(5),
        max_attempts: 3,
        retry_base_delay: Duration::from_millis(1),
    }
}

fn client(provider: &ScriptedChatProvider) -> LlmClient {
    LlmClient::new(Arc::new(provider.clone()), fast_config()).unwrap()
}

#[tokio::test]
async fn test_complete_records_prompt_and_system() {
    let provider = ScriptedChatProvider::always("ok");
    let text = client(&provider).complete("hello", "be strict").await.unwrap();

    assert_eq!(text, "ok");
    assert_eq!(
        provider.calls()[0],
        mock::RecordedCall {
            prompt: "hello".to_string(),
            system_prompt: "be strict".to_string()
        }
    );
}

#[tokio::test]
async fn test_retry_recovers_from_transient_failure() {
    let provider = ScriptedChatProvider::sequence(vec![
        Err(LlmError::Request {
            reason: "reset".to_string(),
        }),
        Ok("second time lucky".to_string()),
    ]);

    let text = client(&provider)
        .complete_with_retry("prompt", "")
        .await
        .unwrap();
    assert_eq!(text, "second time lucky");
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_retry_gives_up_after_max_attempts() {
    let provider = ScriptedChatProvider::failing();
    let err = client(&provider)
        .complete_with_retry("prompt", "")
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Request { .. }));
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn test_plain_complete_does_not_retry() {
    let provider = ScriptedChatProvider::failing();
    assert!(client(&provider).complete("prompt", "").await.is_err());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_timeout_is_enforced() {
    let provider = ScriptedChatProvider::always("late").with_delay(Duration::from_millis(300));
    let config = LlmConfig {
        timeout: Duration::from_millis(20),
        max_attempts: 1,
        ..fast_config()
    };
    let client = LlmClient::new(Arc::new(provider), config).unwrap();

    assert!(matches!(
        client.complete("prompt", "").await,
        Err(LlmError::Timeout { after_ms: 20 })
    ));
}

#[test]
fn test_config_validation() {
    assert!(LlmConfig::default().validate().is_ok());
    let zero = LlmConfig {
        max_attempts: 0,
        ..LlmConfig::default()
    };
    assert!(matches!(zero.validate(), Err(LlmError::InvalidConfig { .. })));
}

#[test]
fn test_genai_provider_keeps_model_name() {
    let provider = GenaiChatProvider::new("llama3.1:8b");
    assert_eq!(provider.model(), "llama3.1:8b");
    assert_eq!(provider.name(), "llama3.1:8b");
}
