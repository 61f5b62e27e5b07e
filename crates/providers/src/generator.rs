//! Adapter from a chat [`Provider`] to the flow engine's [`Generator`].
//!
//! The engine produces one composed prompt per request. Here it becomes a
//! two-message conversation: the configured system instruction followed by
//! the prompt as the user turn.

use std::sync::Arc;

use async_trait::async_trait;
use loveos_config::AppConfig;
use loveos_core::error::ProviderError;
use loveos_core::generator::Generator;
use loveos_core::message::Message;
use loveos_core::provider::{Provider, ProviderRequest};
use tracing::debug;

/// A [`Generator`] backed by a chat-completion [`Provider`].
pub struct ProviderGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    system_prompt: String,
    max_tokens: Option<u32>,
    label: String,
}

impl ProviderGenerator {
    /// Create a generator that sends `model` requests through `provider`.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let label = format!("{}:{}", provider.name(), model);
        Self {
            provider,
            model,
            system_prompt: system_prompt.into(),
            max_tokens: None,
            label,
        }
    }

    /// Cap the length of each generated response.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build a generator for the configured default provider.
    ///
    /// A per-provider `default_model` wins over the global `default_model`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let router = crate::router::build_from_config(config);
        let provider = router.default().ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "provider '{}' is not registered",
                config.default_provider
            ))
        })?;

        let model = config.model_for(&config.default_provider);

        Ok(Self::new(provider, model, config.system_prompt.clone())
            .with_max_tokens(config.max_tokens))
    }

    fn request(&self, prompt: &str, temperature: f32) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::system(&self.system_prompt), Message::user(prompt)],
            temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl Generator for ProviderGenerator {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        let request = self.request(prompt, temperature);
        let response = self.provider.complete(request).await?;

        if let Some(usage) = response.usage {
            debug!(
                generator = %self.label,
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Generation finished"
            );
        }

        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loveos_config::ProviderConfig;
    use loveos_core::message::Role;
    use loveos_core::provider::{ProviderResponse, Usage};
    use std::sync::Mutex;

    /// Records every request and answers with a fixed text or error.
    struct RecordingProvider {
        requests: Mutex<Vec<ProviderRequest>>,
        reply: Result<String, ProviderError>,
    }

    impl RecordingProvider {
        fn answering(text: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Ok(text.into()),
            }
        }

        fn failing(err: ProviderError) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Err(err),
            }
        }
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            self.requests.lock().unwrap().push(request);
            let text = self.reply.clone()?;
            Ok(ProviderResponse {
                message: Message::assistant(text),
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "mock-model".into(),
            })
        }
    }

    #[tokio::test]
    async fn sends_system_then_user_prompt() {
        let provider = Arc::new(RecordingProvider::answering("calm reply"));
        let generator = ProviderGenerator::new(provider.clone(), "gpt-4o", "You are Love-OS.")
            .with_max_tokens(Some(300));

        let text = generator.generate("[User Input]: hi", 0.7).await.unwrap();
        assert_eq!(text, "calm reply");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.model, "gpt-4o");
        assert_eq!(req.max_tokens, Some(300));
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.messages[0].content, "You are Love-OS.");
        assert_eq!(req.messages[1].role, Role::User);
        assert_eq!(req.messages[1].content, "[User Input]: hi");
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let provider = Arc::new(RecordingProvider::failing(ProviderError::RateLimited {
            retry_after_secs: 5,
        }));
        let generator = ProviderGenerator::new(provider, "gpt-4o", "sys");

        let err = generator.generate("hi", 0.1).await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { .. }));
    }

    #[test]
    fn label_combines_provider_and_model() {
        let provider = Arc::new(RecordingProvider::answering("x"));
        let generator = ProviderGenerator::new(provider, "gpt-4o", "sys");
        assert_eq!(generator.name(), "recording:gpt-4o");
    }

    #[test]
    fn from_config_prefers_provider_model() {
        let mut config = AppConfig {
            default_provider: "gemini".into(),
            api_key: Some("g-key".into()),
            ..AppConfig::default()
        };
        config.providers.insert(
            "gemini".into(),
            ProviderConfig {
                api_key: None,
                api_url: None,
                default_model: Some("gemini-1.5-flash".into()),
            },
        );

        let generator = ProviderGenerator::from_config(&config).unwrap();
        assert_eq!(generator.name(), "gemini:gemini-1.5-flash");
    }

    #[test]
    fn from_default_config_uses_openai() {
        let generator = ProviderGenerator::from_config(&AppConfig::default()).unwrap();
        assert_eq!(generator.name(), "openai:gpt-4o");
    }
}
