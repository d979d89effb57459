//! Hosted language model access

use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::ModelSettings;
use crate::error::ModelError;

/// Text completion seam: one prompt in, raw reply text out
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// OpenAI-compatible chat completion client (Groq by default)
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiModel {
    pub fn new(api_key: SecretString, settings: &ModelSettings) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(&settings.api_base);

        Self {
            client: Client::with_config(config),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    /// Build from the key in the configured environment variable
    ///
    /// Returns `None` when the variable is unset or empty; the decision engine
    /// then runs offline.
    pub fn from_env(settings: &ModelSettings) -> Option<Self> {
        match std::env::var(&settings.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                tracing::info!(model = %settings.model, base = %settings.api_base, "Language model configured");
                Some(Self::new(SecretString::from(key), settings))
            }
            _ => {
                tracing::warn!(env = %settings.api_key_env, "Model API key missing, decisions will HOLD");
                None
            }
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages([ChatCompletionRequestMessage::User(message)])
            .build()
            .map_err(|e| ModelError::Request(e.to_string()))?;

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending model request");
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyResponse)
    }
}
