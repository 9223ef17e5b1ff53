//! Chat-completion client for Groq's OpenAI-compatible API.

use crate::domain::chat::{ChatMessage, ChatModel, ChatPrompt};
use crate::domain::error::LlmError;
use crate::infrastructure::config::GroqConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

pub struct GroqClient {
    http: reqwest::Client,
    config: GroqConfig,
}

impl GroqClient {
    pub fn new(config: GroqConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

fn provider_error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ProviderErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Configuration("GROQ_API_KEY is not set".to_string()))?;

        let body = CompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: prompt.messages(),
        };

        debug!("Sending chat completion request");
        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    LlmError::Configuration(e.to_string())
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = provider_error_message(&bytes);
            warn!(status = %status, "Chat completion rejected by provider");
            return Err(LlmError::Provider(format!("{} {}", status.as_u16(), message)));
        }

        let parsed: CompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| LlmError::Provider(format!("malformed response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::Provider("response contained no message content".to_string())
            })?;

        debug!(length = content.len(), "Chat completion received");
        Ok(content)
    }
}
