use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use super::providers::{ChatResponse, Message, OpenAIProvider, Provider, ToolDefinition};
use super::retry::{with_retry, RetryConfig};
use crate::config::Settings;

/// Provider chosen from settings, with retry around every call
pub struct LlmClient {
    provider: Arc<dyn Provider>,
    retry_config: RetryConfig,
}

impl LlmClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let model_config = &settings.model;
        let api_key = settings.get_api_key();

        let provider: Arc<dyn Provider> = match model_config.provider.as_str() {
            "openai" | "openai_compatible" => {
                let key = api_key.with_context(|| {
                    format!(
                        "API key not found. Set {} or model.api_key in the config file.",
                        model_config
                            .api_key_env
                            .as_deref()
                            .unwrap_or("OPENAI_API_KEY")
                    )
                })?;
                Arc::new(OpenAIProvider::new(
                    key,
                    model_config.model.clone(),
                    model_config.base_url.clone(),
                ))
            }
            _ => anyhow::bail!("Unknown provider: {}", model_config.provider),
        };

        tracing::debug!(
            provider = provider.name(),
            model = %model_config.model,
            "LLM client ready"
        );

        Ok(Self {
            provider,
            retry_config: RetryConfig::default(),
        })
    }

    /// Wrap an existing provider, e.g. a scripted one in tests
    pub fn with_provider(provider: Arc<dyn Provider>, retry_config: RetryConfig) -> Self {
        Self {
            provider,
            retry_config,
        }
    }
}

#[async_trait]
impl Provider for LlmClient {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<ChatResponse> {
        let provider = &self.provider;
        with_retry(&self.retry_config, || provider.chat(messages, tools)).await
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::llm::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FlakyProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Provider for FlakyProvider {
        async fn chat(&self, _messages: &[Message], _tools: &[ToolDefinition]) -> Result<ChatResponse> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ApiError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: "overloaded".into(),
                }
                .into());
            }
            Ok(ChatResponse {
                content: "DONE: ok".into(),
                ..Default::default()
            })
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_client_retries_provider() {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicUsize::new(0),
        });
        let retry = RetryConfig {
            initial_delay: Duration::from_millis(1),
            jitter: false,
            ..Default::default()
        };
        let client = LlmClient::with_provider(provider.clone(), retry);

        let response = client.chat(&[Message::user("hi")], &[]).await.unwrap();

        assert_eq!(response.content, "DONE: ok");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.name(), "flaky");
    }

    #[test]
    fn test_inline_key_builds_client() {
        let settings = Settings {
            model: ModelConfig {
                api_key: Some("sk-test".into()),
                api_key_env: None,
                ..Default::default()
            },
            ..Default::default()
        };

        let client = LlmClient::new(&settings).unwrap();
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let settings = Settings {
            model: ModelConfig {
                provider: "carrier-pigeon".into(),
                api_key: Some("x".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = LlmClient::new(&settings).err().unwrap();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn test_missing_key_rejected() {
        let settings = Settings {
            model: ModelConfig {
                api_key: None,
                api_key_env: Some("PLANGUARD_TEST_KEY_THAT_IS_NEVER_SET".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = LlmClient::new(&settings).err().unwrap();
        assert!(err.to_string().contains("PLANGUARD_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
